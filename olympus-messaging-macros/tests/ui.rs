#[test]
fn message_kind_expansions_compile() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/*.rs");
}
