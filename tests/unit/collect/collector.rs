use super::*;
use crate::collect::listing::MemoryLister;

fn paths(v: &[&str]) -> Vec<PathBuf> {
    v.iter().map(PathBuf::from).collect()
}

fn collector(fs: MemoryLister) -> FrameCollector<MemoryLister> {
    FrameCollector::new(fs, CollectOpts::default())
}

#[test]
fn nested_tree_is_lexicographic_depth_first() {
    // Registration order is deliberately scrambled.
    let fs = MemoryLister::new()
        .with_file("/frames/b/2.tif")
        .with_file("/frames/a/2.tif")
        .with_file("/frames/b/1.tif")
        .with_file("/frames/a/1.tif");

    let got = collector(fs).collect(&paths(&["/frames"])).unwrap();
    assert_eq!(
        got,
        paths(&[
            "/frames/a/1.tif",
            "/frames/a/2.tif",
            "/frames/b/1.tif",
            "/frames/b/2.tif",
        ])
    );
}

#[test]
fn ordering_is_by_name_not_numeric() {
    let fs = MemoryLister::new()
        .with_file("r/2.tif")
        .with_file("r/10.tif")
        .with_file("r/1.tif");
    let got = collector(fs).collect(&paths(&["r"])).unwrap();
    assert_eq!(got, paths(&["r/1.tif", "r/10.tif", "r/2.tif"]));
}

#[test]
fn deep_trees_recurse_through_branch_levels() {
    let fs = MemoryLister::new()
        .with_file("r/y/z/0.tif")
        .with_file("r/x/b/0.tif")
        .with_file("r/x/a/1.tif")
        .with_file("r/x/a/0.tif");
    let got = collector(fs).collect(&paths(&["r"])).unwrap();
    assert_eq!(
        got,
        paths(&["r/x/a/0.tif", "r/x/a/1.tif", "r/x/b/0.tif", "r/y/z/0.tif"])
    );
}

#[test]
fn mixed_directory_is_a_structural_violation() {
    let fs = MemoryLister::new()
        .with_file("/frames/x.tif")
        .with_file("/frames/sub/1.tif");

    let err = collector(fs).collect(&paths(&["/frames"])).unwrap_err();
    match err {
        GifMakerError::StructuralViolation { dir, reason } => {
            assert_eq!(dir, PathBuf::from("/frames"));
            assert!(reason.contains("mixes 1 sub-directories with 1 frame files"));
        }
        other => panic!("expected structural violation, got {other:?}"),
    }
}

#[test]
fn empty_directory_anywhere_is_a_structural_violation() {
    let fs = MemoryLister::new()
        .with_file("/frames/a/1.tif")
        .with_dir("/frames/b");

    let err = collector(fs).collect(&paths(&["/frames"])).unwrap_err();
    assert!(matches!(
        err,
        GifMakerError::StructuralViolation { ref dir, .. } if dir == Path::new("/frames/b")
    ));
}

#[test]
fn ineligible_files_are_ignored_but_do_not_satisfy_the_rule() {
    let fs = MemoryLister::new()
        .with_file("r/a/1.tif")
        .with_file("r/a/notes.txt")
        .with_file("r/README.md")
        .with_file("r/b/readme.txt");

    // `r` has only directories once README.md is ignored, but `r/b` holds no frames.
    let err = collector(fs).collect(&paths(&["r"])).unwrap_err();
    assert!(matches!(
        err,
        GifMakerError::StructuralViolation { ref dir, .. } if dir == Path::new("r/b")
    ));
}

#[test]
fn roots_are_concatenated_in_caller_order() {
    let fs = MemoryLister::new()
        .with_file("A/1.tif")
        .with_file("A/2.tif")
        .with_file("B/0.tif");

    let ab = collector(fs.clone()).collect(&paths(&["A", "B"])).unwrap();
    assert_eq!(ab, paths(&["A/1.tif", "A/2.tif", "B/0.tif"]));

    let ba = collector(fs).collect(&paths(&["B", "A"])).unwrap();
    assert_eq!(ba, paths(&["B/0.tif", "A/1.tif", "A/2.tif"]));
}

#[test]
fn no_roots_yields_no_frames() {
    let got = collector(MemoryLister::new()).collect(&[]).unwrap();
    assert!(got.is_empty());
}

#[test]
fn one_bad_root_discards_frames_from_good_roots() {
    let fs = MemoryLister::new().with_file("good/1.tif").with_dir("bad");
    let res = collector(fs).collect(&paths(&["good", "bad"]));
    assert!(matches!(res, Err(GifMakerError::StructuralViolation { .. })));
}

#[test]
fn missing_root_fails() {
    let err = collector(MemoryLister::new())
        .collect(&paths(&["/nope"]))
        .unwrap_err();
    assert!(matches!(err, GifMakerError::Other(_)));
}

#[test]
fn max_depth_bounds_recursion() {
    let fs = MemoryLister::new().with_file("r/a/b/c/1.tif");
    let opts = CollectOpts {
        max_depth: 2,
        ..CollectOpts::default()
    };
    let shallow = FrameCollector::new(fs.clone(), opts);
    assert_eq!(shallow.opts().max_depth, 2);
    let err = shallow.collect(&paths(&["r"])).unwrap_err();
    assert!(err.to_string().contains("max depth 2"));

    let opts = CollectOpts {
        max_depth: 3,
        ..CollectOpts::default()
    };
    let got = FrameCollector::new(fs, opts).collect(&paths(&["r"])).unwrap();
    assert_eq!(got, paths(&["r/a/b/c/1.tif"]));
}

#[test]
fn extension_matching_is_case_insensitive_and_needs_a_dot() {
    let opts = CollectOpts::default();
    assert!(opts.is_frame_name(OsStr::new("a.tif")));
    assert!(opts.is_frame_name(OsStr::new("A.TIF")));
    assert!(!opts.is_frame_name(OsStr::new("a.tiff")));
    assert!(!opts.is_frame_name(OsStr::new("motif")));
    assert!(!opts.is_frame_name(OsStr::new(".tif")));
}

#[test]
fn custom_extensions_strip_dots_and_lowercase() {
    let opts = CollectOpts::with_extensions([".PNG", "tiff", ""]);
    assert_eq!(opts.extensions, vec!["png".to_string(), "tiff".to_string()]);
    assert!(opts.is_frame_name(OsStr::new("x.png")));
    assert!(opts.is_frame_name(OsStr::new("x.tiff")));
    assert!(!opts.is_frame_name(OsStr::new("x.tif")));
}

#[test]
fn empty_extension_list_is_rejected() {
    let opts = CollectOpts::with_extensions(Vec::<String>::new());
    let err = FrameCollector::new(MemoryLister::new(), opts)
        .collect(&[])
        .unwrap_err();
    assert!(matches!(err, GifMakerError::Validation(_)));
}

#[test]
fn collect_frames_walks_the_real_filesystem() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().join("frames");
    for sub in ["b", "a"] {
        std::fs::create_dir_all(root.join(sub)).unwrap();
        for f in ["2.tif", "1.tif"] {
            std::fs::write(root.join(sub).join(f), b"x").unwrap();
        }
    }

    let got = collect_frames(&[root.clone()], &CollectOpts::default()).unwrap();
    assert_eq!(
        got,
        vec![
            root.join("a").join("1.tif"),
            root.join("a").join("2.tif"),
            root.join("b").join("1.tif"),
            root.join("b").join("2.tif"),
        ]
    );
}
