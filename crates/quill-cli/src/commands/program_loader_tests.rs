use std::io::Write;
use std::path::Path;

use quill_bytecode::{Colors, dump};
use quill_vm::StreamInput;

use super::program_loader::{LoadError, load_program, read_program_path};

#[test]
fn load_program_keeps_first_line() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "5#\r\nignored").unwrap();

    let program = load_program(file.path()).unwrap();
    assert_eq!(program.len(), 3);
}

#[test]
fn load_program_missing_file() {
    let err = load_program(Path::new("/nonexistent/prog.ql")).unwrap_err();
    assert!(matches!(err, LoadError::Read { .. }));
    assert!(
        err.to_string().starts_with("failed to read '/nonexistent/prog.ql': "),
        "{err}"
    );
}

#[test]
fn read_program_path_takes_first_token() {
    let mut input = StreamInput::new(&b"  prog.ql 1 2\n"[..]);
    let path = read_program_path(&mut input).unwrap();
    assert_eq!(path.as_deref(), Some(Path::new("prog.ql")));

    let rest = input.into_inner();
    assert_eq!(rest, b" 1 2\n");
}

#[test]
fn read_program_path_empty_input() {
    let mut input = StreamInput::new(&b" \n"[..]);
    assert_eq!(read_program_path(&mut input).unwrap(), None);
}

#[test]
fn loaded_program_dump() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, r"1?2#!\").unwrap();

    let program = load_program(file.path()).unwrap();
    insta::assert_snapshot!(dump(&program, Colors::OFF), @r"
    [code]
      0  1  push 1
      1  ?  loop → 5
      2  2  push 2
      3  #  puti
      4  !  break
      5  \  end → 1
    ");
}
