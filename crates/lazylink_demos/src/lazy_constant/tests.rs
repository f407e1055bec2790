use std::io::Write;

use lazylink_bind::CallError;
use pretty_assertions::assert_eq;

use super::*;

const DOCUMENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- staff list -->
<company name="Acme">
  <notes>company notes are skipped</notes>
  <department>
    <employee id="7">
      <name>Ada</name>
      <notes>Likes <b>bold</b> ideas &amp; tea</notes>
    </employee>
    <employee id="8">
      <notes>second</notes>
    </employee>
  </department>
</company>
"#;

fn resource_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn first_nested_notes_upper_cased() {
    assert_eq!(extract_notes(DOCUMENT).unwrap(), "LIKES BOLD IDEAS & TEA");
}

#[test]
fn notes_outside_employee_are_ignored() {
    let xml = "<company><notes>no</notes><employees/></company>";
    assert_eq!(extract_notes(xml).unwrap(), "");
    assert_eq!(extract_notes("<employee><notes>x</notes></employee>").unwrap(), "");
}

#[test]
fn references_and_cdata() {
    let xml = "<company><employee><notes>&lt;&#65;&#x42;&gt;<![CDATA[<raw> & ]]>&quot;&apos;</notes></employee></company>";
    assert_eq!(extract_notes(xml).unwrap(), "<AB><RAW> & \"'");
}

#[test]
fn self_closing_notes_are_empty() {
    let xml = "<company><employee><notes/><notes>late</notes></employee></company>";
    assert_eq!(extract_notes(xml).unwrap(), "");
}

#[test]
fn malformed_documents() {
    let cases = [
        "<company><employee></company>",
        "<company><employee><notes>&bogus;</notes></employee></company>",
        "<company><!-- never closed",
        "<company",
        "<company>",
    ];
    for xml in cases {
        let err = extract_notes(xml).unwrap_err();
        assert!(matches!(err, ResourceError::Malformed { .. }), "{xml}: {err:?}");
    }
}

#[test]
fn empty_resource_name_yields_empty_notes() {
    assert_eq!(parse_notes("").unwrap(), "");
    assert_eq!(EagerResource::load("").unwrap().notes().unwrap(), "");
}

#[test]
fn missing_file_is_an_io_error() {
    let err = parse_notes("/nonexistent/lazylink/notes.xml").unwrap_err();
    assert!(matches!(err, ResourceError::Io { .. }), "{err:?}");
}

#[test]
fn lazy_resource_parses_on_first_use_only() {
    let file = resource_file(DOCUMENT);
    let path = file.path().to_str().unwrap();

    let lazy = LazyResource::new(path).unwrap();
    assert_eq!(lazy.not_needing_notes(), "called 'not_needing_notes'");
    assert_eq!(lazy.parse_count(), 0);
    assert!(!lazy.site().is_resolved());

    assert_eq!(lazy.notes().unwrap(), "LIKES BOLD IDEAS & TEA");
    assert_eq!(lazy.notes().unwrap(), "LIKES BOLD IDEAS & TEA");
    assert_eq!(lazy.parse_count(), 1);
}

#[test]
fn lazy_resource_ignores_later_file_changes() {
    let mut file = resource_file(DOCUMENT);
    let lazy = LazyResource::new(file.path().to_str().unwrap()).unwrap();
    assert_eq!(lazy.notes().unwrap(), "LIKES BOLD IDEAS & TEA");

    file.as_file_mut().set_len(0).unwrap();
    assert_eq!(lazy.notes().unwrap(), "LIKES BOLD IDEAS & TEA");
}

#[test]
fn eager_and_lazy_agree() {
    let file = resource_file(DOCUMENT);
    let path = file.path().to_str().unwrap();
    let eager = EagerResource::load(path).unwrap();
    let lazy = LazyResource::new(path).unwrap();
    assert_eq!(eager.notes().unwrap(), lazy.notes().unwrap());
}

#[test]
fn lazy_failure_poisons_the_site() {
    let lazy = LazyResource::new("/nonexistent/lazylink/notes.xml").unwrap();
    let first = lazy.notes().unwrap_err();
    let second = lazy.notes().unwrap_err();
    assert!(
        matches!(
            first,
            DemoError::Call(CallError::Resolution(ResolutionError::Bootstrap(_)))
        ),
        "{first:?}"
    );
    assert_eq!(first.to_string(), second.to_string());
    assert_eq!(lazy.parse_count(), 1);
}

#[test]
fn quoted_attribute_values_may_contain_angle_brackets() {
    let xml = r#"<company motto="a > b"><employee id='x>y' note="it's"><notes kind="q/">ok</notes></employee></company>"#;
    assert_eq!(extract_notes(xml).unwrap(), "OK");

    let self_closing = r#"<company><employee><notes when="t>0"/></employee></company>"#;
    assert_eq!(extract_notes(self_closing).unwrap(), "");
}

#[test]
fn unterminated_attribute_quote_is_malformed() {
    let err = extract_notes(r#"<company name="open>"#).unwrap_err();
    assert!(matches!(err, ResourceError::Malformed { .. }), "{err:?}");
}
