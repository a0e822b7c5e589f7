//! `.vcxproj.filters` files: the virtual folder tree shown in the IDE.

use std::collections::HashSet;
use std::path::Path;

use crate::core::project::FileType;
use crate::emit::xml::{render_document, Element, MSBUILD_NAMESPACE};
use crate::sources::ResolvedFile;
use crate::util::fs::{artifact_relative_path, to_windows_separators};
use crate::util::hash::{identifier_for, upper};

const SOURCE_BIN: &str = "Source Files";
const HEADER_BIN: &str = "Header Files";
const RESOURCE_BIN: &str = "Resource Files";
const CONTENT_BIN: &str = "Content";

/// Prefix hashed with a folder path to identify its filter.
const FILTER_PREFIX: &str = "#FilterPrefix#";

struct StandardBin {
    name: &'static str,
    file_type: FileType,
    identifier: &'static str,
    extensions: &'static str,
}

const STANDARD_BINS: &[StandardBin] = &[
    StandardBin {
        name: SOURCE_BIN,
        file_type: FileType::Source,
        identifier: "4FC737F1-C7A5-4376-A066-2A32D752A2FF",
        extensions: "cpp;c;cc;cxx;c++;cppm;ixx;def;odl;idl;hpj;bat;asm;asmx",
    },
    StandardBin {
        name: HEADER_BIN,
        file_type: FileType::Include,
        identifier: "93995380-89BD-4b04-88EB-625FBE52EBFB",
        extensions: "h;hh;hpp;hxx;h++;hm;inl;inc;ipp;xsd",
    },
    StandardBin {
        name: RESOURCE_BIN,
        file_type: FileType::Resource,
        identifier: "67DA6AB6-F800-4c08-8B7A-83BB121AAD01",
        extensions: "rc;ico;cur;bmp;dlg;rc2;rct;bin;rgs;gif;jpg;jpeg;jpe;resx;tiff;tif;png;wav;mfcribbon-ms",
    },
];

/// Top-level folder a file type is shown under. `Misc` files sit at the
/// project root.
pub fn bin_for(file_type: FileType) -> &'static str {
    match file_type {
        FileType::Source => SOURCE_BIN,
        FileType::Include => HEADER_BIN,
        FileType::Resource => RESOURCE_BIN,
        FileType::Content => CONTENT_BIN,
        FileType::Misc | FileType::Auto => "",
    }
}

/// Folder of a file in the filter tree, `\`-separated, "" for the root.
fn folder_of(file: &ResolvedFile) -> String {
    let full = Path::new(bin_for(file.file_type)).join(&file.filter_path);
    full.parent().map(to_windows_separators).unwrap_or_default()
}

fn is_reserved(folder: &str) -> bool {
    [SOURCE_BIN, HEADER_BIN, RESOURCE_BIN, CONTENT_BIN]
        .iter()
        .any(|bin| bin.eq_ignore_ascii_case(folder))
}

/// Every non-reserved folder the files live in, parents included, without
/// case-insensitive duplicates, sorted case-insensitively.
pub fn collect_folders<'a>(folders: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for folder in folders {
        let mut prefix = String::new();
        for segment in folder.split('\\').filter(|s| !s.is_empty()) {
            if !prefix.is_empty() {
                prefix.push('\\');
            }
            prefix.push_str(segment);

            if !is_reserved(&prefix) && seen.insert(prefix.to_uppercase()) {
                out.push(prefix.clone());
            }
        }
    }

    out.sort_by_cached_key(|f| f.to_uppercase());
    out
}

fn filter_entry(name: &str, identifier: &str, extensions: Option<&str>) -> Element {
    let mut filter = Element::new("Filter").attr("Include", name);
    filter.push_key("UniqueIdentifier", format!("{{{}}}", identifier));
    if let Some(extensions) = extensions {
        filter.push_key("Extensions", extensions);
    }
    filter
}

/// Render the filters file of project `name`.
pub fn render_filters(name: &str, files: &[ResolvedFile]) -> Vec<u8> {
    let project_dir = Path::new(name);
    let folders: Vec<String> = files.iter().map(folder_of).collect();

    let mut root = Element::new("Project")
        .attr("ToolsVersion", "4.0")
        .attr("xmlns", MSBUILD_NAMESPACE);

    let present: HashSet<FileType> = files.iter().map(|f| f.file_type).collect();

    let mut filters = Element::new("ItemGroup");
    for bin in STANDARD_BINS {
        if present.contains(&bin.file_type) {
            filters.push(filter_entry(bin.name, bin.identifier, Some(bin.extensions)));
        }
    }
    if present.contains(&FileType::Content) {
        filters.push(filter_entry(CONTENT_BIN, &upper(identifier_for(CONTENT_BIN)), None));
    }
    for folder in collect_folders(folders.iter().map(String::as_str)) {
        let identifier = upper(identifier_for(&format!("{}{}", FILTER_PREFIX, folder)));
        filters.push(filter_entry(&folder, &identifier, None));
    }
    root.push(filters);

    let groups: [(&str, fn(FileType) -> bool); 3] = [
        ("ClCompile", |t| t == FileType::Source),
        ("ClInclude", |t| t == FileType::Include),
        ("None", |t| matches!(t, FileType::Content | FileType::Misc)),
    ];

    for (kind, selects) in groups {
        let mut group = Element::new("ItemGroup");
        for (file, folder) in files.iter().zip(&folders) {
            if !selects(file.file_type) {
                continue;
            }
            let mut item = Element::new(kind).attr("Include", artifact_relative_path(project_dir, &file.path));
            if !folder.is_empty() {
                item.push_key("Filter", folder.as_str());
            }
            group.push(item);
        }
        if !group.is_empty() {
            root.push(group);
        }
    }

    render_document(&root)
}
