//! A tiny hand-assembled sfnt: just an `OS/2` and a `name` table, enough
//! for the provider to read names and style from.

pub struct TestFace<'a> {
    pub family: &'a str,
    pub full: &'a str,
    pub postscript: &'a str,
    pub weight_class: u16,
    pub width_class: u16,
    pub fs_selection: u16,
}

pub const BOLD_ITALIC: TestFace<'static> = TestFace {
    family: "Test Sans",
    full: "Test Sans Bold Italic",
    postscript: "TestSans-BoldItalic",
    weight_class: 700,
    width_class: 5,
    fs_selection: 0x0001,
};

fn push_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn push_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn os2_table(face: &TestFace<'_>) -> Vec<u8> {
    // Version 0 is 78 bytes; everything not set here stays zero
    let mut table = vec![0u8; 78];
    table[4..6].copy_from_slice(&face.weight_class.to_be_bytes());
    table[6..8].copy_from_slice(&face.width_class.to_be_bytes());
    table[62..64].copy_from_slice(&face.fs_selection.to_be_bytes());
    table
}

fn name_table(face: &TestFace<'_>) -> Vec<u8> {
    let strings: Vec<(u16, Vec<u8>)> = [(1, face.family), (4, face.full), (6, face.postscript)]
        .into_iter()
        .map(|(id, text)| {
            let utf16 = text.encode_utf16().flat_map(u16::to_be_bytes).collect();
            (id, utf16)
        })
        .collect();

    let mut table = Vec::new();
    push_u16(&mut table, 0); // format
    push_u16(&mut table, strings.len() as u16);
    push_u16(&mut table, 6 + 12 * strings.len() as u16);

    let mut offset = 0u16;
    for (id, bytes) in &strings {
        push_u16(&mut table, 3); // Windows
        push_u16(&mut table, 1); // Unicode BMP
        push_u16(&mut table, 0x409); // English (US)
        push_u16(&mut table, *id);
        push_u16(&mut table, bytes.len() as u16);
        push_u16(&mut table, offset);
        offset += bytes.len() as u16;
    }
    for (_, bytes) in &strings {
        table.extend_from_slice(bytes);
    }
    table
}

/// Build a font file for `face`
pub fn build_font(face: &TestFace<'_>) -> Vec<u8> {
    // Table records must be sorted by tag
    let tables = [(*b"OS/2", os2_table(face)), (*b"name", name_table(face))];

    let mut font = Vec::new();
    push_u32(&mut font, 0x0001_0000);
    push_u16(&mut font, tables.len() as u16);
    push_u16(&mut font, 32); // searchRange
    push_u16(&mut font, 1); // entrySelector
    push_u16(&mut font, 0); // rangeShift

    let mut offset = 12 + 16 * tables.len() as u32;
    for (tag, data) in &tables {
        font.extend_from_slice(tag);
        push_u32(&mut font, 0); // checksum, unchecked by readers
        push_u32(&mut font, offset);
        push_u32(&mut font, data.len() as u32);
        offset += (data.len() as u32 + 3) & !3;
    }
    for (_, data) in &tables {
        font.extend_from_slice(data);
        font.resize((font.len() + 3) & !3, 0);
    }
    font
}
