//! Minimal edits to Xcode `project.pbxproj` files for bundled resources

use sha1::{Digest, Sha1};

/// Deterministic 24-character object id derived from a seed
pub fn object_id(seed: &str) -> String {
    let digest = Sha1::digest(seed.as_bytes());
    hex::encode_upper(digest)[..24].to_string()
}

/// Register `file_name` (at `path`, relative to the `ios/` dir) as a resource.
///
/// Adds a PBXFileReference, a PBXBuildFile, an entry in the first Resources
/// build phase and a child of the main group. Already-registered files are
/// left untouched, so the edit is idempotent.
pub fn add_resource(content: &str, file_name: &str, path: &str) -> String {
    let file_ref = object_id(&format!("fileref:{}", path));
    let build_file = object_id(&format!("buildfile:{}", path));
    if content.contains(&file_ref) {
        return content.to_string();
    }

    let mut out = content.to_string();
    out = insert_before(
        &out,
        "/* End PBXBuildFile section */",
        &format!(
            "\t\t{build_file} /* {file_name} in Resources */ = {{isa = PBXBuildFile; fileRef = {file_ref} /* {file_name} */; }};\n"
        ),
    );
    out = insert_before(
        &out,
        "/* End PBXFileReference section */",
        &format!(
            "\t\t{file_ref} /* {file_name} */ = {{isa = PBXFileReference; lastKnownFileType = file; name = \"{file_name}\"; path = \"{path}\"; sourceTree = \"<group>\"; }};\n"
        ),
    );
    out = append_to_list(
        &out,
        "isa = PBXResourcesBuildPhase;",
        "files = (",
        &format!("{build_file} /* {file_name} in Resources */,"),
    );
    if let Some(main_group) = main_group_id(&out) {
        out = append_to_list(
            &out,
            &format!("{main_group} = {{"),
            "children = (",
            &format!("{file_ref} /* {file_name} */,"),
        );
    }
    out
}

fn insert_before(content: &str, marker: &str, text: &str) -> String {
    match content.find(marker) {
        Some(index) => format!("{}{}{}", &content[..index], text, &content[index..]),
        None => content.to_string(),
    }
}

/// Append `item` to the first `list_open ... );` list following `anchor`
fn append_to_list(content: &str, anchor: &str, list_open: &str, item: &str) -> String {
    let Some(anchor_at) = content.find(anchor) else {
        return content.to_string();
    };
    let Some(open_rel) = content[anchor_at..].find(list_open) else {
        return content.to_string();
    };
    let list_start = anchor_at + open_rel + list_open.len();
    let Some(close_rel) = content[list_start..].find(");") else {
        return content.to_string();
    };
    let close_at = list_start + close_rel;

    // The closing line's indentation plus one tab is the item indentation
    let line_start = content[..close_at].rfind('\n').map_or(0, |i| i + 1);
    let close_indent = &content[line_start..close_at];
    let indent = if close_indent.trim().is_empty() {
        format!("{}\t", close_indent)
    } else {
        "\t\t\t\t".to_string()
    };
    format!(
        "{}{}{}\n{}",
        &content[..line_start],
        indent,
        item,
        &content[line_start..]
    )
}

fn main_group_id(content: &str) -> Option<String> {
    let start = content.find("mainGroup = ")? + "mainGroup = ".len();
    let id: String = content[start..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect();
    (!id.is_empty()).then_some(id)
}
