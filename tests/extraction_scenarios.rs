//! End-to-end selector scenarios over real C# sources.

use codesnip::extractor::csharp::index_source;
use codesnip::{extract_spans, Build, ExtractError, ExtractionMode, ExtractorRegistry, LookupError};
use std::fs;
use tempfile::TempDir;

const NESTED_NAMESPACES: &str = r#"namespace NS
{
    namespace NS2.NS3
    {
        class A
        {
            int First;
        }
    }
}

namespace NS2
{
    namespace NS2.NS3
    {
        class A
        {
            int Second;
        }
    }
}
"#;

const OVERLOADS: &str = r#"public class Greeter
{
    public void Foo(string name)
    {
        Console.WriteLine(name);
    }

    public void Foo(string name, int times)
    {
        Console.WriteLine(name + times);
    }
}
"#;

const OPTIONS: &str = r#"namespace Demo
{
    public class Options
    {
        public void Method()
        {
            // some content
        }
    }
}
"#;

const EVENTS: &str = r#"class Bus
{
    public event EventHandler Changed
    {
        add { handlers += value; }
        remove
        {
            handlers -= value;
        }
    }
}
"#;

fn extract(source: &str, pattern: &str, mode: ExtractionMode) -> Result<String, LookupError> {
    let (_, index) = index_source(source).unwrap();
    let node = index.find(pattern)?;
    Ok(extract_spans(source, node.spans(), mode))
}

fn full(source: &str, pattern: &str) -> String {
    extract(source, pattern, ExtractionMode::FullMember).unwrap()
}

#[test]
fn test_namespace_suffixes_resolve() {
    let first = "class A\n{\n    int First;\n}";
    let second = "class A\n{\n    int Second;\n}";

    assert_eq!(full(NESTED_NAMESPACES, "NS.NS2.NS3.A"), first);
    assert_eq!(full(NESTED_NAMESPACES, "NS2.NS2.NS3.A"), second);

    // Both classes end in NS2.NS3.A
    let shared = full(NESTED_NAMESPACES, "NS2.NS3.A");
    assert_eq!(shared, format!("{first}\n\n{second}"));
    assert_ne!(shared, full(NESTED_NAMESPACES, "NS.NS2.NS3.A"));

    assert_eq!(full(NESTED_NAMESPACES, "A"), format!("{first}\n\n{second}"));
    assert_eq!(full(NESTED_NAMESPACES, "A.First"), "int First;");
    assert_eq!(full(NESTED_NAMESPACES, "NS3.A.Second"), "int Second;");
}

#[test]
fn test_overloads_by_name_and_parameters() {
    let one = "public void Foo(string name)\n{\n    Console.WriteLine(name);\n}";
    let two = "public void Foo(string name, int times)\n{\n    Console.WriteLine(name + times);\n}";

    assert_eq!(full(OVERLOADS, "Foo"), format!("{one}\n\n{two}"));
    assert_eq!(full(OVERLOADS, "Greeter.Foo"), format!("{one}\n\n{two}"));
    assert_eq!(full(OVERLOADS, "Foo(string)"), one);
    assert_eq!(full(OVERLOADS, "Greeter.Foo( string, int )"), two);
    assert_eq!(full(OVERLOADS, "(string,int)"), two);
}

#[test]
fn test_block_structure_stub() {
    let text = extract(OPTIONS, "Options.Method", ExtractionMode::BlockStructureOnly).unwrap();
    assert_eq!(text, "public void Method()\n{\n    // ...\n}");
    assert!(!text.contains("some content"));
}

#[test]
fn test_content_only_accessors() {
    let remove = extract(EVENTS, "Bus.Changed.remove", ExtractionMode::ContentOnly).unwrap();
    assert_eq!(remove, "handlers -= value;");

    let add = extract(EVENTS, "Changed.add", ExtractionMode::ContentOnly).unwrap();
    assert_eq!(add, "handlers += value;");
}

#[test]
fn test_empty_pattern_is_whole_file() {
    assert_eq!(full(OPTIONS, ""), OPTIONS.trim_end());
}

#[test]
fn test_unknown_member_suggests_close_key() {
    let err = extract(OPTIONS, "Option.Method", ExtractionMode::FullMember).unwrap_err();
    match err {
        LookupError::NotFound {
            chunk, suggestion, ..
        } => {
            assert_eq!(chunk, "Option");
            assert_eq!(suggestion.as_deref(), Some("Options"));
        }
    }
}

#[test]
fn test_build_session_reuses_indexes() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("Options.cs"), OPTIONS).unwrap();
    fs::write(dir.path().join("Greeter.cs"), OVERLOADS).unwrap();

    let mut build = Build::new(
        ExtractorRegistry::with_defaults(),
        vec![dir.path().to_path_buf()],
    );

    let stub = build.extract("csharp[Options.cs](1,3) =Options.Method", None).unwrap();
    assert_eq!(stub.text, "public void Method()\n{\n    // ...\n}");
    assert_eq!(stub.highlight_lines.iter().copied().collect::<Vec<_>>(), vec![1, 3]);

    let greeter = build.extract("cs[Greeter.cs] Foo(string)", None).unwrap();
    assert!(greeter.text.starts_with("public void Foo(string name)"));

    let missing = build.extract("csharp[Greeter.cs] Greeter.Bar", None).unwrap_err();
    assert!(matches!(missing, ExtractError::MemberNotFound { .. }));

    // Edits after the first read are not observed within one session
    fs::write(dir.path().join("Options.cs"), "class Other {}\n").unwrap();
    assert!(build.extract("csharp[Options.cs] Options.Method", None).is_ok());
}

#[test]
fn test_directive_relative_to_document() {
    let dir = TempDir::new().unwrap();
    let docs = dir.path().join("docs");
    fs::create_dir_all(docs.join("snippets")).unwrap();
    fs::write(docs.join("snippets").join("Options.cs"), OPTIONS).unwrap();

    let mut build = Build::new(ExtractorRegistry::with_defaults(), Vec::new());
    let snippet = build
        .extract("csharp[snippets/Options.cs] -Options.Method", Some(&docs))
        .unwrap();
    assert_eq!(snippet.text, "// some content");

    assert!(matches!(
        build.extract("csharp[snippets/Options.cs] Options", None),
        Err(ExtractError::TargetNotFound { .. })
    ));
}

#[test]
fn test_block_structure_for_brace_less_members() {
    let source = "class C\n{\n    public int Count;\n\n    public int Twice(int x) => x * 2;\n}\n";

    let field = extract(source, "C.Count", ExtractionMode::BlockStructureOnly).unwrap();
    assert_eq!(field, "public int Count\n{\n    // ...\n}");

    let twice = extract(source, "C.Twice", ExtractionMode::BlockStructureOnly).unwrap();
    assert_eq!(twice, "public int Twice(int x)\n{\n    // ...\n}");
}

#[test]
fn test_attribute_braces_do_not_open_the_body() {
    let source = r#"class C
{
    [Route("api/{id}")]
    public string Get(int id)
    {
        return "{" + id;
    }
}
"#;

    let stub = extract(source, "C.Get", ExtractionMode::BlockStructureOnly).unwrap();
    assert_eq!(
        stub,
        "[Route(\"api/{id}\")]\npublic string Get(int id)\n{\n    // ...\n}"
    );

    let body = extract(source, "C.Get", ExtractionMode::ContentOnly).unwrap();
    assert_eq!(body, "return \"{\" + id;");
}

#[test]
fn test_namespace_prefix_renders_each_block_once() {
    let source = r#"namespace NS2
{
    namespace NS2.NS3
    {
        class A { }
    }
}

namespace NS2.NS3
{
    class B { }
}
"#;

    let outer = full(source, "NS2");
    assert_eq!(outer.matches("namespace NS2.NS3").count(), 1);
    assert!(outer.starts_with("namespace NS2\n{"));
    assert!(!outer.contains("class B"));

    let both = full(source, "NS2.NS3");
    assert!(both.contains("class A") && both.contains("class B"));
}

#[test]
fn test_file_scoped_namespace_covers_the_file() {
    let source = "namespace Demo;\n\npublic class Widget\n{\n    int Size;\n}\n";
    assert_eq!(full(source, "Demo"), source.trim_end());
    assert_eq!(full(source, "Demo.Widget.Size"), "int Size;");
}
