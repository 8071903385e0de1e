//! End-to-end pipeline runs over an embedded fixture site.

use std::fs;
use std::path::Path;

use include_dir::{include_dir, Dir};
use webtidy_core::{Config, Mode, Pipeline, WriteTarget};

static FIXTURES: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/tests/fixtures");

/// Copy the embedded fixture site into a scratch directory and return
/// the site root.
fn extract_site(scratch: &Path) -> std::path::PathBuf {
    FIXTURES.extract(scratch).unwrap();
    scratch.join("site")
}

#[test]
fn test_minify_writes_output_tree() {
    let dir = tempfile::tempdir().unwrap();
    let root = extract_site(dir.path());

    let pipeline = Pipeline::new(Config::default(), Mode::Minify, WriteTarget::OutputDir);
    let report = pipeline.run_all(&root);
    assert!(report.success(), "failures: {:?}", report.failed);
    assert_eq!(report.formatted, 3);

    let out = root.join("minified");
    let css = fs::read_to_string(out.join("css/site.css")).unwrap();
    insta::assert_snapshot!(css, @".card{color:red;background:blue}.card > .title{margin:0}");

    let js = fs::read_to_string(out.join("js/app.js")).unwrap();
    assert_eq!(js, "function add(a,b){\nreturn a+b;\n}\nconst total=add(1,2);");

    let html = fs::read_to_string(out.join("index.html")).unwrap();
    assert_eq!(
        html,
        "<!DOCTYPE html> <html> <head> <style>body{margin:0}</style> </head> \
         <body>  <p>Hello <b>world</b></p> \
         <script type=\"text/javascript\">const greet=()=>{\nconsole.log(\"hi\");\n};\ngreet();</script> \
         </body> </html> "
    );

    // sources untouched
    assert!(fs::read_to_string(root.join("js/app.js"))
        .unwrap()
        .starts_with("// entry"));
}

#[test]
fn test_prettify_rewrites_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let root = extract_site(dir.path());

    let pipeline = Pipeline::new(Config::default(), Mode::Prettify, WriteTarget::InPlace);
    let report = pipeline.run_all(&root);
    assert!(report.success(), "failures: {:?}", report.failed);
    assert_eq!(report.formatted, 3);

    let html = fs::read_to_string(root.join("index.html")).unwrap();
    let expected = [
        "<!DOCTYPE html>",
        "<html>",
        "  <head>",
        "    <style>",
        "      body{margin:0}",
        "    </style>",
        "  </head>",
        "  <body>",
        "    <!-- banner -->",
        "    <p>",
        "      Hello",
        "      <b>world</b>",
        "    </p>",
        "    <script type=\"text/javascript\">",
        "      const greet = () => {",
        "      \tconsole.log(\"hi\");",
        "      };",
        "      greet();",
        "    </script>",
        "  </body>",
        "</html>",
        "",
    ]
    .join("\n");
    assert_eq!(html, expected);

    let js = fs::read_to_string(root.join("js/app.js")).unwrap();
    assert_eq!(
        js,
        "// entry\nfunction add(a, b) {\n\treturn a + b;\n}\n\nconst total = add(1, 2);\n"
    );

    let css = fs::read_to_string(root.join("css/site.css")).unwrap();
    assert_eq!(
        css,
        "/* cards */\n.card {\n  color: red;\n  background: blue;\n}\n\n.card > .title {\n  margin: 0;\n}\n"
    );
}

#[test]
fn test_config_controls_output_dir_and_ignores() {
    let dir = tempfile::tempdir().unwrap();
    let root = extract_site(dir.path());
    fs::write(
        root.join(".webtidy.toml"),
        "ignore = [\"^js/\"]\n\n[output]\nminify_dir = \"dist\"\n",
    )
    .unwrap();

    let (config, found_root) = Config::find_from(&root.join("css")).unwrap();
    assert_eq!(found_root, root);

    let pipeline = Pipeline::new(config, Mode::Minify, WriteTarget::OutputDir);
    let report = pipeline.run_all(&found_root);
    assert!(report.success(), "failures: {:?}", report.failed);
    assert_eq!(report.formatted, 2);

    assert!(root.join("dist/index.html").exists());
    assert!(root.join("dist/css/site.css").exists());
    assert!(!root.join("dist/js").exists());
    assert!(!root.join("minified").exists());
}
