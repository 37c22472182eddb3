//! VM execution tests.
//!
//! Each test runs a one-line program against in-memory input and checks the
//! bytes written plus the final register contents (non-empty registers as
//! JSON, front first).

use std::io::{self, Write};

use quill_bytecode::{Program, RegisterId};

use super::{FuelLimits, Register, RegisterBank, RuntimeError, StreamInput, VM, Value};

struct Run {
    vm: VM,
    output: Vec<u8>,
    result: Result<(), RuntimeError>,
}

impl Run {
    fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }

    fn registers(&self) -> String {
        serde_json::to_string(self.vm.registers()).expect("json serialization failed")
    }

    fn register(&self, letter: char) -> &Register {
        let id = RegisterId::from_letter(letter).expect("register letter");
        self.vm.registers().get(id)
    }

    #[track_caller]
    fn ok(self) -> Self {
        if let Err(e) = &self.result {
            panic!("execution failed: {e}");
        }
        self
    }

    #[track_caller]
    fn err(&self) -> &RuntimeError {
        self.result.as_ref().expect_err("execution should fail")
    }
}

fn run_with(mut vm: VM, source: &str, input: &str) -> Run {
    let program = Program::load(source);
    let mut input = StreamInput::new(input.as_bytes());
    let mut output = Vec::new();
    let result = vm.execute(&program, &mut input, &mut output);
    Run { vm, output, result }
}

fn run(source: &str, input: &str) -> Run {
    run_with(VM::default(), source, input)
}

fn preloaded(letter: char, values: &[Value]) -> VM {
    let mut bank = RegisterBank::new();
    let id = RegisterId::from_letter(letter).expect("register letter");
    *bank.get_mut(id) = values.iter().copied().collect();
    VM::builder().registers(bank).build()
}

// ============================================================================
// Literals, selection and transfer
// ============================================================================

#[test]
fn digit_then_print_int_round_trips() {
    for d in 0..=9 {
        let r = run(&format!("{d}#"), "").ok();
        assert_eq!(r.stdout(), d.to_string());
    }
}

#[test]
fn digits_push_to_front() {
    let r = run("123", "").ok();
    insta::assert_snapshot!(r.registers(), @r#"{"a":[3,2,1]}"#);
}

#[test]
fn lowercase_selects_register() {
    let r = run("a1b2c3", "").ok();
    insta::assert_snapshot!(r.registers(), @r#"{"a":[1],"b":[2],"c":[3]}"#);
    assert_eq!(r.vm.active_register().letter(), 'c');
}

#[test]
fn uppercase_transfers_front_value() {
    let r = run("12B", "").ok();
    insta::assert_snapshot!(r.registers(), @r#"{"a":[1],"b":[2]}"#);
}

#[test]
fn transfer_keeps_active_register() {
    let r = run("b5A7", "").ok();
    insta::assert_snapshot!(r.registers(), @r#"{"a":[5],"b":[7]}"#);
}

#[test]
fn transfer_from_empty_register_is_noop() {
    let r = run("B", "").ok();
    insta::assert_snapshot!(r.registers(), @"{}");
}

// ============================================================================
// Register shuffling
// ============================================================================

#[test]
fn dup_then_pop_twice_yields_same_value() {
    let r = run("7:##", "").ok();
    assert_eq!(r.stdout(), "77");
}

#[test]
fn swap_exchanges_top_two() {
    let r = run("12;", "").ok();
    insta::assert_snapshot!(r.registers(), @r#"{"a":[1,2]}"#);
}

#[test]
fn rotate_back_to_front() {
    let r = run("123.", "").ok();
    insta::assert_snapshot!(r.registers(), @r#"{"a":[1,3,2]}"#);
}

#[test]
fn rotate_front_to_back() {
    let r = run("123,", "").ok();
    insta::assert_snapshot!(r.registers(), @r#"{"a":[2,1,3]}"#);
}

#[test]
fn space_drops_top() {
    let r = run("12 ", "").ok();
    insta::assert_snapshot!(r.registers(), @r#"{"a":[1]}"#);
}

#[test]
fn starved_operations_are_noops() {
    for op in [":", ";", ".", ",", " ", "~", "#", "^", "@", "\""] {
        let r = run(op, "").ok();
        assert_eq!(r.registers(), "{}", "op {op:?}");
        assert_eq!(r.stdout(), "", "op {op:?}");
    }
}

#[test]
fn binary_ops_with_one_value_leave_register_unchanged() {
    for op in ["+", "-", "*", "/", "%", "=", ">", "<", "&", "|", ";"] {
        let r = run(&format!("5{op}"), "").ok();
        assert_eq!(r.registers(), r#"{"a":[5]}"#, "op {op:?}");
    }
}

// ============================================================================
// Arithmetic and type promotion
// ============================================================================

#[test]
fn integer_arithmetic_stays_integer() {
    let cases = [("34+", 7), ("35-", -2), ("34*", 12), ("72%", 1)];
    for (source, expected) in cases {
        let r = run(source, "").ok();
        assert_eq!(r.register('a').front(), Some(Value::Integer(expected)), "{source}");
    }
}

#[test]
fn mixed_operands_promote_to_float() {
    let cases = [("`3+", 5.5), ("`3-", -0.5), ("`2*", 5.0), ("`2%", 0.5)];
    for (source, expected) in cases {
        let r = run(source, "2.5").ok();
        assert_eq!(r.register('a').front(), Some(Value::Float(expected)), "{source}");
    }
}

#[test]
fn division_is_always_float() {
    let r = run("63/", "").ok();
    assert_eq!(r.register('a').front(), Some(Value::Float(2.0)));

    let r = run("34/", "").ok();
    insta::assert_snapshot!(r.registers(), @r#"{"a":[0.75]}"#);
}

#[test]
fn integer_arithmetic_wraps() {
    let vm = preloaded('a', &[Value::Integer(1), Value::Integer(i64::MAX)]);
    let r = run_with(vm, "+", "").ok();
    assert_eq!(r.register('a').front(), Some(Value::Integer(i64::MIN)));
}

#[test]
fn comparisons_push_integer_flags() {
    let cases = [("35<", 1), ("35>", 0), ("33=", 1), ("34=", 0)];
    for (source, expected) in cases {
        let r = run(source, "").ok();
        assert_eq!(r.register('a').front(), Some(Value::Integer(expected)), "{source}");
    }

    let r = run("`3<", "2.5").ok();
    assert_eq!(r.register('a').front(), Some(Value::Integer(1)));
}

#[test]
fn logic_uses_integer_truthiness() {
    let cases = [("30&", 0), ("32&", 1), ("30|", 1), ("00|", 0), ("0~", 1), ("5~", 0)];
    for (source, expected) in cases {
        let r = run(source, "").ok();
        assert_eq!(r.register('a').front(), Some(Value::Integer(expected)), "{source}");
    }
}

#[test]
fn integer_remainder_by_zero_is_fatal() {
    let r = run("50%", "");
    assert!(matches!(r.err(), RuntimeError::RemainderByZero { ip: 2 }));
    insta::assert_snapshot!(r.registers(), @r#"{"a":[0,5]}"#);
}

#[test]
fn float_remainder_by_zero_is_nan() {
    let r = run("`0%", "5.5").ok();
    let front = r.register('a').front().expect("result");
    assert!(front.as_float().is_nan());
}

// ============================================================================
// Output
// ============================================================================

#[test]
fn print_float_uses_six_significant_digits() {
    let r = run("34/^9^13/^", "").ok();
    assert_eq!(r.stdout(), "0.7590.333333");
}

#[test]
fn print_char_writes_byte() {
    let r = run("99*7+@", "").ok();
    assert_eq!(r.stdout(), "X");
}

#[test]
fn output_failure_is_io_error() {
    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    let program = Program::load("5#");
    let mut vm = VM::default();
    let mut input = StreamInput::new(&b""[..]);
    let err = vm
        .execute(&program, &mut input, &mut Broken)
        .expect_err("write should fail");
    assert!(matches!(err, RuntimeError::Io(_)));
}

// ============================================================================
// Input
// ============================================================================

#[test]
fn read_number_parses_tokens() {
    let r = run("`````", "42 x\n3.5  7.0").ok();
    insta::assert_snapshot!(r.registers(), @r#"{"a":[-1,7,3.5,-1,42]}"#);
}

#[test]
fn read_char_pushes_byte_codes() {
    let r = run("'''", "hi").ok();
    insta::assert_snapshot!(r.registers(), @r#"{"a":[-1,105,104]}"#);
}

#[test]
fn read_string_until_delimiter() {
    // 9*4+8 = 44 = ','
    let r = run(r#"94*8+"'"#, "ab,cd").ok();
    insta::assert_snapshot!(r.registers(), @r#"{"a":[99,97,98,0]}"#);
}

#[test]
fn read_string_zero_delimiter_reads_token() {
    let r = run(r#"0""#, "  foo bar").ok();
    insta::assert_snapshot!(r.registers(), @r#"{"a":[102,111,111,0]}"#);
}

#[test]
fn read_string_delimiter_multiple_of_256_reads_to_nul() {
    // 4*4*4*4 = 256; only an exact 0 selects token mode
    let r = run(r#"44*4*4*""#, "ab cd").ok();
    insta::assert_snapshot!(r.registers(), @r#"{"a":[97,98,32,99,100,0]}"#);
}

#[test]
fn read_number_uses_numeric_prefix() {
    let r = run("```", "12abc 3.5x 5,").ok();
    insta::assert_snapshot!(r.registers(), @r#"{"a":[5,3.5,12]}"#);
}

#[test]
fn input_bytes_are_unsigned() {
    let r = run(r#"'0""#, "\u{e9}x").ok();
    insta::assert_snapshot!(r.registers(), @r#"{"a":[169,120,0,195]}"#);
}

#[test]
fn read_string_at_end_of_input_pushes_terminator() {
    let r = run(r#"0"5""#, "").ok();
    insta::assert_snapshot!(r.registers(), @r#"{"a":[0,0]}"#);
}

#[test]
fn read_string_without_delimiter_is_noop() {
    let r = run(r#""'"#, "z").ok();
    insta::assert_snapshot!(r.registers(), @r#"{"a":[122]}"#);
}

// ============================================================================
// Loops
// ============================================================================

#[test]
fn countdown_loop() {
    let r = run(r"3:?:@1-:\", "").ok();
    assert_eq!(r.output, [3, 2, 1]);
    insta::assert_snapshot!(r.registers(), @r#"{"a":[0]}"#);
    assert_eq!(r.vm.loop_depth(), 0);
    assert!(!r.vm.is_skipping());
}

#[test]
fn countdown_loop_from_preloaded_register() {
    let vm = preloaded('a', &[Value::Integer(3)]);
    let r = run_with(vm, r":?:@1-:\", "").ok();
    assert_eq!(r.output, [3, 2, 1]);
}

#[test]
fn false_condition_skips_body() {
    let r = run(r"0?5#\7#", "").ok();
    assert_eq!(r.stdout(), "7");
    insta::assert_snapshot!(r.registers(), @"{}");
}

#[test]
fn empty_register_condition_skips_body() {
    let r = run(r"b?5#\7#", "").ok();
    assert_eq!(r.stdout(), "7");
}

#[test]
fn skip_passes_over_nested_loop() {
    let r = run(r"0?1?2#\3#\4#", "").ok();
    assert_eq!(r.stdout(), "4");
}

#[test]
fn nested_loops_run() {
    let r = run(r"2:?1?9#0\1-:\", "").ok();
    assert_eq!(r.stdout(), "99");
    insta::assert_snapshot!(r.registers(), @r#"{"a":[0]}"#);
}

#[test]
fn unclosed_false_loop_skips_to_end() {
    let r = run("0?5#", "").ok();
    assert_eq!(r.stdout(), "");
    assert!(r.vm.is_skipping());
}

#[test]
fn unclosed_true_loop_runs_body_once() {
    let r = run("1?5#", "").ok();
    assert_eq!(r.stdout(), "5");
    assert_eq!(r.vm.loop_depth(), 1);
}

#[test]
fn loop_close_without_open_loop_is_fatal() {
    let r = run(r"5#\6#", "");
    assert!(matches!(r.err(), RuntimeError::UnmatchedLoopClose { ip: 2 }));
    assert_eq!(r.stdout(), "5");
}

#[test]
fn loop_close_after_finished_loop_is_fatal() {
    let r = run(r"0?\\", "");
    assert!(matches!(r.err(), RuntimeError::UnmatchedLoopClose { ip: 3 }));
}

// ============================================================================
// Break
// ============================================================================

#[test]
fn break_leaves_innermost_loop() {
    let r = run(r"1?5#!6#\7#", "").ok();
    assert_eq!(r.stdout(), "57");
    assert_eq!(r.vm.loop_depth(), 0);
}

#[test]
fn break_ends_endless_loop() {
    let r = run(r"1:?!\2#", "").ok();
    assert_eq!(r.stdout(), "2");
}

#[test]
fn break_skips_nested_loops_in_body() {
    let r = run(r"1?!1?9#\8#\7#", "").ok();
    assert_eq!(r.stdout(), "7");
}

#[test]
fn break_in_inner_loop_continues_outer_body() {
    let r = run(r"1?1?!5#\6#!\7#", "").ok();
    assert_eq!(r.stdout(), "67");
    assert_eq!(r.vm.loop_depth(), 0);
}

#[test]
fn break_without_loop_skips_past_next_close() {
    let r = run(r"!5#\6#", "").ok();
    assert_eq!(r.stdout(), "6");
}

// ============================================================================
// Program shape, fuel and state
// ============================================================================

#[test]
fn only_first_line_runs() {
    let r = run("5#\n6#", "").ok();
    assert_eq!(r.stdout(), "5");
}

#[test]
fn empty_program_runs_terminator_only() {
    let r = run("", "").ok();
    assert_eq!(r.vm.steps(), 1);
    assert_eq!(r.vm.ip(), 1);
}

#[test]
fn fuel_counts_skipped_instructions() {
    // 0 ? 1 2 3 4 \ and the terminator
    let vm = VM::builder().exec_fuel(8).build();
    let r = run_with(vm, r"0?1234\", "").ok();
    assert_eq!(r.vm.steps(), 8);

    let vm = VM::builder().exec_fuel(7).build();
    let r = run_with(vm, r"0?1234\", "");
    assert!(matches!(r.err(), RuntimeError::ExecFuelExhausted(7)));
}

#[test]
fn fuel_stops_endless_loop() {
    let vm = VM::builder().limits(FuelLimits::new().exec_fuel(100)).build();
    let r = run_with(vm, r"1:?:\", "");
    assert!(matches!(r.err(), RuntimeError::ExecFuelExhausted(100)));
    assert_eq!(r.vm.steps(), 100);
}

#[test]
fn unlimited_fuel_by_default() {
    assert_eq!(VM::default().limits().get_exec_fuel(), None);
}

#[test]
fn registers_carry_over_between_runs() {
    let program = Program::load("b1");
    let mut vm = VM::default();
    let mut input = StreamInput::new(&b""[..]);
    let mut output = Vec::new();
    vm.execute(&program, &mut input, &mut output).unwrap();
    vm.execute(&program, &mut input, &mut output).unwrap();

    let b = vm.registers().get(RegisterId::from_letter('b').unwrap());
    assert_eq!(b.len(), 2);
    assert_eq!(vm.active_register().letter(), 'b');
}
