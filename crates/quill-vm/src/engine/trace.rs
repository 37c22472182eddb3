//! Tracing infrastructure for debugging VM execution.
//!
//! The tracer is a zero-cost abstraction: with `NoopTracer` every hook is an
//! empty `#[inline(always)]` function and the calls compile away. Tracing
//! state lives in the tracer, never in the VM.

use quill_bytecode::dump::{display_symbol, format_instruction};
use quill_bytecode::{Colors, Instruction, Program, RegisterId, width_for_count};

use super::register::Register;

/// Verbosity level for trace output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Default: executed instructions and loop events.
    #[default]
    Default,
    /// Verbose (-v): also register contents after each instruction.
    Verbose,
    /// Very verbose (-vv): also every instruction scanned while skipping.
    VeryVerbose,
}

/// Tracer trait for VM execution instrumentation.
///
/// Each method is called at a specific point during execution:
/// - `trace_instruction` - before executing an instruction
/// - `trace_register` - after an instruction touched a register
/// - `trace_skip` - for each instruction scanned in skip mode
/// - `trace_loop_enter` / `trace_loop_skip` - when `?` opens or skips a loop
/// - `trace_loop_back` - when `\` jumps back to its `?`
/// - `trace_break` - when `!` leaves the innermost loop
/// - `trace_skip_end` - when skip mode ends on a `\`
/// - `trace_halt` - when the program runs off its end
pub trait Tracer {
    /// Called before executing an instruction.
    fn trace_instruction(&mut self, ip: usize, instr: Instruction, active: RegisterId);

    /// Called after an instruction touched a register.
    fn trace_register(&mut self, id: RegisterId, register: &Register);

    /// Called for each instruction scanned while skipping.
    fn trace_skip(&mut self, ip: usize, instr: Instruction, depth: usize);

    /// Called when a true condition opens a loop. `depth` counts open loops.
    fn trace_loop_enter(&mut self, ip: usize, depth: usize);

    /// Called when a false condition starts skipping a loop body.
    fn trace_loop_skip(&mut self, ip: usize);

    /// Called when a loop close jumps back to its loop open.
    fn trace_loop_back(&mut self, ip: usize, target: usize);

    /// Called when a break starts skipping.
    fn trace_break(&mut self, ip: usize);

    /// Called when skip mode ends at the loop close at `ip`.
    fn trace_skip_end(&mut self, ip: usize);

    /// Called once the program ran to its end.
    fn trace_halt(&mut self, steps: u64);
}

/// No-op tracer that gets optimized away completely.
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_instruction(&mut self, _ip: usize, _instr: Instruction, _active: RegisterId) {}

    #[inline(always)]
    fn trace_register(&mut self, _id: RegisterId, _register: &Register) {}

    #[inline(always)]
    fn trace_skip(&mut self, _ip: usize, _instr: Instruction, _depth: usize) {}

    #[inline(always)]
    fn trace_loop_enter(&mut self, _ip: usize, _depth: usize) {}

    #[inline(always)]
    fn trace_loop_skip(&mut self, _ip: usize) {}

    #[inline(always)]
    fn trace_loop_back(&mut self, _ip: usize, _target: usize) {}

    #[inline(always)]
    fn trace_break(&mut self, _ip: usize) {}

    #[inline(always)]
    fn trace_skip_end(&mut self, _ip: usize) {}

    #[inline(always)]
    fn trace_halt(&mut self, _steps: u64) {}
}

/// Tracer that collects a formatted execution trace.
///
/// Lines are buffered and written to stderr by [`PrintTracer::print`], so the
/// trace never interleaves with program output on stdout.
pub struct PrintTracer {
    /// Verbosity level for output filtering.
    verbosity: Verbosity,
    /// Collected trace lines.
    lines: Vec<String>,
    /// Width of the instruction index column.
    step_width: usize,
    /// Color palette.
    colors: Colors,
}

/// Builder for [`PrintTracer`].
pub struct PrintTracerBuilder {
    step_width: usize,
    verbosity: Verbosity,
    colored: bool,
}

impl PrintTracerBuilder {
    pub fn verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn colored(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    pub fn build(self) -> PrintTracer {
        PrintTracer {
            verbosity: self.verbosity,
            lines: Vec::new(),
            step_width: self.step_width,
            colors: Colors::new(self.colored),
        }
    }
}

impl PrintTracer {
    /// Create a builder sized for `program`.
    pub fn builder(program: &Program) -> PrintTracerBuilder {
        PrintTracerBuilder {
            step_width: width_for_count(program.len()),
            verbosity: Verbosity::Default,
            colored: false,
        }
    }

    /// Collected lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Print all trace lines to stderr.
    pub fn print(&self) {
        for line in &self.lines {
            eprintln!("{line}");
        }
    }

    /// Add an instruction line.
    fn add_instruction(&mut self, ip: usize, instr: Instruction, content: &str) {
        let c = self.colors;
        self.lines.push(format!(
            "  {}{:0sw$}{} {} {content}",
            c.dim,
            ip,
            c.reset,
            display_symbol(instr),
            sw = self.step_width
        ));
    }

    /// Add a sub-line (blank step area + content).
    fn add_subline(&mut self, content: &str) {
        let step_area = 2 + self.step_width + 3;
        self.lines.push(format!("{:step_area$}{content}", ""));
    }

    fn format_register(&self, id: RegisterId, register: &Register) -> String {
        let c = self.colors;
        let values: Vec<String> = register.iter().map(|v| v.to_string()).collect();
        format!("{}{id}{}: [{}]", c.register, c.reset, values.join(", "))
    }

    fn format_ip(&self, ip: usize) -> String {
        let c = self.colors;
        format!("{}{:0sw$}{}", c.target, ip, c.reset, sw = self.step_width)
    }
}

impl Tracer for PrintTracer {
    fn trace_instruction(&mut self, ip: usize, instr: Instruction, _active: RegisterId) {
        if instr.is_nop() {
            return;
        }
        let content = format_instruction(instr, &self.colors);
        self.add_instruction(ip, instr, &content);
    }

    fn trace_register(&mut self, id: RegisterId, register: &Register) {
        if self.verbosity < Verbosity::Verbose {
            return;
        }
        let line = self.format_register(id, register);
        self.add_subline(&line);
    }

    fn trace_skip(&mut self, ip: usize, instr: Instruction, depth: usize) {
        if self.verbosity < Verbosity::VeryVerbose || instr.is_nop() {
            return;
        }
        let c = self.colors;
        let content = format!("{}skip {} (depth {depth}){}", c.dim, instr.mnemonic(), c.reset);
        self.add_instruction(ip, instr, &content);
    }

    fn trace_loop_enter(&mut self, _ip: usize, depth: usize) {
        self.add_subline(&format!("↓ enter loop (depth {depth})"));
    }

    fn trace_loop_skip(&mut self, _ip: usize) {
        self.add_subline("↷ skip loop");
    }

    fn trace_loop_back(&mut self, _ip: usize, target: usize) {
        let target = self.format_ip(target);
        self.add_subline(&format!("↑ back to {target}"));
    }

    fn trace_break(&mut self, _ip: usize) {
        self.add_subline("↷ break");
    }

    fn trace_skip_end(&mut self, ip: usize) {
        let resume = self.format_ip(ip + 1);
        self.add_subline(&format!("→ resume at {resume}"));
    }

    fn trace_halt(&mut self, steps: u64) {
        let c = self.colors;
        self.lines
            .push(format!("{}halt after {steps} steps{}", c.dim, c.reset));
    }
}
