use kiln::file_segments::FileSegments;

#[test]
fn test_segments() {
    let segments = FileSegments::new("/a/b/c/d.txt");

    assert_eq!(segments.file, "/a/b/c/d.txt");
    assert_eq!(segments.path, "/a/b/c");
    assert_eq!(segments.file_name, "d.txt");
    assert_eq!(segments.ext, ".txt");
    assert_eq!(segments.file_name_only, "d");
}

#[test]
fn test_interpolate_rebuilds_the_file() {
    let segments = FileSegments::new("/a/b/c/d.txt");
    assert_eq!(segments.interpolate("$T_PATH$/$T_FILE_NAME_ONLY$$T_EXT$"), "/a/b/c/d.txt");
}

#[test]
fn test_interpolate_is_case_insensitive() {
    let segments = FileSegments::new("/a/b/c/d.txt");
    assert_eq!(segments.interpolate("$t_path$/$T_File_Name$"), "/a/b/c/d.txt");
}

#[test]
fn test_interpolate_every_occurrence() {
    let segments = FileSegments::new("src/models/order.rb");
    assert_eq!(
        segments.interpolate("spec/$T_FILE_NAME_ONLY$/$T_FILE_NAME_ONLY$_spec$T_EXT$"),
        "spec/order/order_spec.rb"
    );
    assert_eq!(segments.interpolate("$T_FILE$|$T_FILE$"), "src/models/order.rb|src/models/order.rb");
}

#[test]
fn test_interpolate_without_tokens() {
    let segments = FileSegments::new("/a/b/c/d.txt");
    assert_eq!(segments.interpolate("plain.txt"), "plain.txt");
}

#[test]
fn test_file_without_folder_or_extension() {
    let segments = FileSegments::new("Makefile");

    assert_eq!(segments.path, ".");
    assert_eq!(segments.ext, "");
    assert_eq!(segments.file_name_only, "Makefile");
}
