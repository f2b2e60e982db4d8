use std::fs;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::Value;

use super::modules::ModuleDirectory;
use super::*;
use crate::collab::ModuleSet;
use crate::id::ViewId;
use crate::row::row;
use crate::test_fixtures::{Answer, CountingSource, context, context_in};

#[rstest]
#[case::bare(None, None, "users")]
#[case::fields(Some(&["name"][..]), None, "users(name)")]
#[case::filter(None, Some("active=1"), "users active=1")]
#[case::both(Some(&["name"][..]), Some("active=1"), "users(name) active=1")]
#[case::many_fields(Some(&["name", "email"][..]), None, "users(name,email)")]
fn data_identifier_composition(#[case] fields: Option<&[&str]>, #[case] filter: Option<&str>, #[case] expected: &str) {
	let mut options = ViewOptions::data(CountingSource::new("users", Answer::Rows));
	if let Some(fields) = fields {
		options = options.fields(fields.iter().copied());
	}
	if let Some(filter) = filter {
		options = options.filter(filter);
	}
	let validated = options.validate(&context()).unwrap();
	assert_eq!(validated.id().as_str(), expected);
}

#[test]
fn filter_text_is_not_escaped() {
	// "(name)" inside a filter reproduces a field-subset identifier shape.
	let id = ViewId::for_data("users", None, Some("(name) x"));
	assert_eq!(id.as_str(), "users (name) x");
	let id = ViewId::for_data("users", Some(&["a".to_string()]), Some("b c"));
	assert_eq!(id.as_str(), "users(a) b c");
}

#[test]
fn fields_identifier_ignores_filter_and_subset() {
	let source = CountingSource::new("users", Answer::Rows);
	let plain = ViewOptions::fields_of(source.clone()).validate(&context()).unwrap();
	let narrowed = ViewOptions::fields_of(source)
		.filter("active=1")
		.fields(["name"])
		.validate(&context())
		.unwrap();
	assert_eq!(plain.id(), narrowed.id());
	assert_eq!(plain.id().as_str(), "users");
}

#[test]
fn array_materializer_aliases_caller_rows() {
	let rows = SharedRows::new(vec![row([("n", 1)])]);
	let validated = ViewOptions::array("a", rows.clone()).validate(&context()).unwrap();
	let filled = ViewKind::Array.materialize(&validated, &context()).unwrap();
	assert!(SharedRows::ptr_eq(&rows, &filled));
}

#[test]
fn array_materializer_fails_without_rows() {
	let validated = ViewOptions::new(ViewKind::Array).id("a").validate(&context()).unwrap();
	let cause = ViewKind::Array.materialize(&validated, &context()).unwrap_err();
	assert_eq!(cause, MaterializeCause::MissingRows);
}

#[rstest]
#[case::nothing(Answer::Nothing, MaterializeCause::NoRows)]
#[case::error(Answer::Fail, MaterializeCause::Source("connection reset".into()))]
fn data_materializer_distinguishes_failures(#[case] answer: Answer, #[case] expected: MaterializeCause) {
	let source = CountingSource::new("users", answer);
	let validated = ViewOptions::data(source.clone()).validate(&context()).unwrap();
	let cause = ViewKind::Data.materialize(&validated, &context()).unwrap_err();
	assert_eq!(cause, expected);
	assert_eq!(source.row_calls(), 1);
}

#[test]
fn data_materializer_passes_filter_and_fields() {
	let source = CountingSource::new("users", Answer::Rows);
	let validated = ViewOptions::data(source)
		.filter("active=1")
		.fields(["name", "email"])
		.validate(&context())
		.unwrap();
	let rows = ViewKind::Data.materialize(&validated, &context()).unwrap().snapshot();
	assert_eq!(rows, vec![row([("filter", "active=1"), ("fields", "name,email")])]);
}

#[test]
fn fields_materializer_requests_detail() {
	let source = CountingSource::new("users", Answer::Rows);
	let validated = ViewOptions::fields_of(source.clone()).validate(&context()).unwrap();
	let rows = ViewKind::Fields.materialize(&validated, &context()).unwrap().snapshot();
	assert_eq!(rows[0]["detailed"], true);

	let missing = CountingSource::new("users", Answer::Nothing);
	let validated = ViewOptions::fields_of(missing).validate(&context()).unwrap();
	let cause = ViewKind::Fields.materialize(&validated, &context()).unwrap_err();
	assert_eq!(cause, MaterializeCause::NoRows);
}

#[rstest]
#[case::lower("foo.php", Some("foo"))]
#[case::upper("BAR.PHP", Some("bar"))]
#[case::mixed("Baz.PhP", Some("baz"))]
#[case::other_suffix("readme.txt", None)]
#[case::suffix_only(".php", None)]
#[case::shorter("php", None)]
#[case::inner_match("foo.php.bak", None)]
fn module_name_derivation(#[case] file_name: &str, #[case] expected: Option<&str>) {
	let dir = ModuleDirectory::new("modules", ".php");
	assert_eq!(dir.module_name(file_name).as_deref(), expected);
}

#[test]
fn modules_enumerate_matching_entries() {
	let tmp = tempfile::tempdir().unwrap();
	for name in ["foo.php", "BAR.PHP", "readme.txt"] {
		fs::write(tmp.path().join(name), "").unwrap();
	}
	let catalog = Arc::new(ModuleSet::with_modules(["foo"]));
	let ctx = context_in(tmp.path()).with_modules(catalog);

	let validated = ViewOptions::modules().validate(&ctx).unwrap();
	let rows = ViewKind::Modules.materialize(&validated, &ctx).unwrap().snapshot();
	assert_eq!(
		rows,
		vec![
			row([("id", Value::from("bar")), ("inUse", Value::from(false))]),
			row([("id", Value::from("foo")), ("inUse", Value::from(true))]),
		]
	);
}

#[test]
fn unreadable_module_directory_yields_no_rows() {
	let tmp = tempfile::tempdir().unwrap();
	let ctx = context_in(&tmp.path().join("missing"));
	let validated = ViewOptions::modules().validate(&ctx).unwrap();
	let rows = ViewKind::Modules.materialize(&validated, &ctx).unwrap();
	assert!(rows.is_empty());
}
