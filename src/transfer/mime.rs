//! File name helpers: extensions and upload content types.
//!
//! Extension lookup ignores ASCII case, so `photo.JPG` and `photo.jpg` upload
//! with the same content type. Unknown extensions keep their original case.

/// Content types of the formats the bridge is usually asked to move.
const CONTENT_TYPES: &[(&str, &str)] = &[
    ("png", "application/image"),
    ("jpg", "application/image"),
    ("txt", "application/txt"),
    ("ipt", "application/vnd.autodesk.inventor.part"),
    ("iam", "application/vnd.autodesk.inventor.assembly"),
    ("dwf", "application/vnd.autodesk.autocad.dwf"),
    ("dwg", "application/vnd.autodesk.autocad.dwg"),
    ("f3d", "application/vnd.autodesk.fusion360"),
    ("f2d", "application/vnd.autodesk.fusiondoc"),
    ("rvt", "application/vnd.autodesk.revit"),
];

/// Content type used when a file name has no extension at all.
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Text after the final `.`, if any.
pub fn file_extension(file_name: &str) -> Option<&str> {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
}

/// `file_name` without its final `.<ext>` suffix.
///
/// `my.file.jpg` → `my.file`, `myfile` → `myfile`.
pub fn without_extension(file_name: &str) -> &str {
    file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(file_name)
}

/// Upload content type for `file_name`.
///
/// Known extensions map through a fixed table (case-insensitive); anything
/// else becomes `application/<extension>` with the extension kept verbatim.
pub fn content_type(file_name: &str) -> String {
    let Some(extension) = file_extension(file_name) else {
        return FALLBACK_CONTENT_TYPE.to_string();
    };

    CONTENT_TYPES
        .iter()
        .find(|(ext, _)| ext.eq_ignore_ascii_case(extension))
        .map(|(_, mime)| mime.to_string())
        .unwrap_or_else(|| format!("application/{extension}"))
}
