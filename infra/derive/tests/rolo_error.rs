use rolo_derive::rolo_error;
use std::borrow::Cow;

#[rolo_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read_missing() -> Result<Vec<u8>, DemoError> {
    std::fs::read("/definitely/not/here.bin").context("Reading fixture")
}

#[test]
fn source_errors_convert_with_context() {
    let err = read_missing().unwrap_err();
    assert!(matches!(err, DemoError::Io { context: Some(_), .. }));
    assert!(err.to_string().starts_with("IO error (Reading fixture): "));
}

#[test]
fn question_mark_converts_without_context() {
    fn open() -> Result<(), DemoError> {
        std::fs::File::open("/definitely/not/here.bin")?;
        Ok(())
    }

    let err = open().unwrap_err();
    assert!(matches!(err, DemoError::Io { context: None, .. }));
}

#[test]
fn context_is_attached_to_own_variants() {
    let res: Result<(), DemoError> =
        Err(DemoError::NotFound { message: "client:42".into(), context: None });
    let err = res.context("Deleting client").unwrap_err();
    assert_eq!(err.to_string(), "Not found (Deleting client): client:42");
}

#[test]
fn strings_become_internal_errors() {
    let from_static: DemoError = "boom".into();
    let from_owned: DemoError = String::from("bang").into();

    assert_eq!(from_static.to_string(), "Internal error: boom");
    assert!(matches!(from_owned, DemoError::Internal { .. }));
}
