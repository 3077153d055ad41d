use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use web2native::{convert_project, ConvertOptions, FailureKind, FileKind, RenameTables};

fn fixture_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/web")
}

fn run(output: &Path) -> web2native::RunReport {
    convert_project(
        &fixture_root(),
        output,
        &ConvertOptions::default(),
        &RenameTables::default(),
    )
    .unwrap()
}

/// Relative path -> bytes for every file under `root`.
fn snapshot(root: &Path) -> BTreeMap<String, Vec<u8>> {
    fn walk(root: &Path, dir: &Path, out: &mut BTreeMap<String, Vec<u8>>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(root, &path, out);
            } else {
                let rel = path.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/");
                out.insert(rel, fs::read(&path).unwrap());
            }
        }
    }
    let mut out = BTreeMap::new();
    walk(root, root, &mut out);
    out
}

#[test]
fn test_fixture_project_converts() {
    let output = tempfile::tempdir().unwrap();
    let report = run(output.path());

    let produced: Vec<(&str, &str, FileKind)> = report
        .converted
        .iter()
        .map(|f| (f.source.as_str(), f.output.as_str(), f.kind))
        .collect();
    assert_eq!(
        produced,
        vec![
            ("App.jsx", "App.tsx", FileKind::Script),
            ("components/Header.jsx", "components/Header.tsx", FileKind::Script),
            ("components/nav/Menu.js", "components/nav/Menu.tsx", FileKind::Script),
            ("styles/app.css", "styles/app.styles.js", FileKind::Stylesheet),
        ]
    );

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].path, "components/Broken.jsx");
    assert_eq!(report.failures[0].kind, FailureKind::Parse);
    assert_eq!(report.ignored, 1);
    assert!(report.ensure_usable().is_ok());

    // non-convertible files are not copied
    assert!(!output.path().join("assets").exists());
    assert!(!output.path().join("components/Broken.tsx").exists());
}

#[test]
fn test_app_component_output() {
    let output = tempfile::tempdir().unwrap();
    run(output.path());

    let app = fs::read_to_string(output.path().join("App.tsx")).unwrap();
    let expected = r#"import React, { useState } from "react";
// react-router-dom is not compatible with React Native
// Use: @react-navigation/native
// Use @react-navigation/native with @react-navigation/stack for navigation
import Header from "./components/Header";

export default function App() {
  const [count, setCount] = useState(0);

  return (
    <BrowserRouter>
      <View style="app">
        <Header title="Counter" />
        <Text style="count">{count}</Text>
        <TouchableOpacity onPress={() => setCount(count + 1)}>Increment</TouchableOpacity>
        <Link to="/about">About</Link>
      </View>
    </BrowserRouter>
  );
}
"#;
    assert_eq!(app, expected);
}

#[test]
fn test_class_component_output() {
    let output = tempfile::tempdir().unwrap();
    run(output.path());

    let header = fs::read_to_string(output.path().join("components/Header.tsx")).unwrap();
    assert!(header.contains("// Use: react-native-head\n"));
    assert!(!header.contains("from \"react-helmet\""));
    assert!(header.contains("<View style=\"header\" {...rest}>"));
    assert!(header.contains("<Image src=\"/logo.png\" style=\"logo\" />"));
    assert!(header.contains("<Text>{title}</Text>"));
    assert!(header.contains("<Helmet><title>{title}</title></Helmet>"));
    assert!(header.contains("static defaultProps = { title: \"\" };"));
}

#[test]
fn test_nested_script_mirrors_directories() {
    let output = tempfile::tempdir().unwrap();
    run(output.path());

    let menu = fs::read_to_string(output.path().join("components/nav/Menu.tsx")).unwrap();
    assert!(menu.contains("<ul style=\"menu\">"));
    assert!(menu.contains("<li key={item.id}>"));
    assert!(menu.contains("<Text onPress={() => onSelect(item)}>{item.label}</Text>"));
}

#[test]
fn test_style_module_output() {
    let output = tempfile::tempdir().unwrap();
    run(output.path());

    let module = fs::read_to_string(output.path().join("styles/app.styles.js")).unwrap();
    let expected = r#"import { StyleSheet } from "react-native";

export default StyleSheet.create({
  "app": {
    "backgroundColor": "white",
    "display": "flex",
    "flexDirection": "column",
    "paddingTop": "16px"
  },
  "count": {
    "fontSize": "24px"
  }
});
"#;
    assert_eq!(module, expected);
}

#[test]
fn test_runs_are_byte_identical() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();

    let report_a = run(first.path());
    let options = ConvertOptions {
        threads: 1,
        ..ConvertOptions::default()
    };
    let report_b = convert_project(
        &fixture_root(),
        second.path(),
        &options,
        &RenameTables::default(),
    )
    .unwrap();

    assert_eq!(snapshot(first.path()), snapshot(second.path()));
    assert_eq!(report_a.converted, report_b.converted);
}

#[test]
fn test_deep_nesting_relative_to_top_root() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let deep = input.path().join("a/b/c");
    fs::create_dir_all(&deep).unwrap();
    fs::create_dir_all(input.path().join("a/z")).unwrap();
    fs::write(deep.join("Widget.jsx"), "export const W = () => <span>w</span>;\n").unwrap();
    fs::write(input.path().join("a/z/notes.txt"), "ignored").unwrap();

    let report = convert_project(
        input.path(),
        output.path(),
        &ConvertOptions::default(),
        &RenameTables::default(),
    )
    .unwrap();

    assert_eq!(report.converted.len(), 1);
    assert_eq!(report.converted[0].output, "a/b/c/Widget.tsx");
    assert_eq!(
        fs::read_to_string(output.path().join("a/b/c/Widget.tsx")).unwrap(),
        "export const W = () => <Text>w</Text>;\n"
    );
    assert!(!output.path().join("Widget.tsx").exists());
}

#[test]
fn test_report_serializes_to_json() {
    let output = tempfile::tempdir().unwrap();
    let report = run(output.path());

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["converted"][0]["output"], "App.tsx");
    assert_eq!(json["converted"][3]["kind"], "stylesheet");
    assert_eq!(json["failures"][0]["kind"], "parse");
    assert_eq!(json["converted"][0]["contentHash"].as_str().unwrap().len(), 64);
}
