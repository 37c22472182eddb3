//! Virtual machine for executing Quill programs.

use quill_bytecode::{Instruction, Program, RegisterId};

use super::error::RuntimeError;
use super::io::{Input, Output};
use super::register::RegisterBank;
use super::trace::{NoopTracer, Tracer};
use super::value::Value;

/// Runtime limits for program execution.
#[derive(Clone, Copy, Debug, Default)]
pub struct FuelLimits {
    /// Maximum total steps, skipped instructions included (default: unlimited).
    pub(crate) exec_fuel: Option<u64>,
}

impl FuelLimits {
    /// Create new fuel limits with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the execution fuel limit.
    pub fn exec_fuel(mut self, fuel: u64) -> Self {
        self.exec_fuel = Some(fuel);
        self
    }

    pub fn get_exec_fuel(&self) -> Option<u64> {
        self.exec_fuel
    }
}

/// Whether instructions are executed or only scanned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Running,
    /// Scanning forward for the loop close that ends a skipped body.
    Skipping,
}

/// Virtual machine state for program execution.
pub struct VM {
    pub(crate) registers: RegisterBank,
    pub(crate) active: RegisterId,
    /// Current instruction pointer.
    pub(crate) ip: usize,
    /// Position of the `?` of every open loop, innermost last.
    pub(crate) loop_markers: Vec<usize>,
    /// Loop opens seen, counting open loops and nested opens passed while skipping.
    ///
    /// Equals `loop_markers.len()` whenever the VM is running.
    pub(crate) skip_depth: usize,
    mode: Mode,
    pub(crate) steps: u64,
    pub(crate) limits: FuelLimits,
}

/// Builder for VM instances.
#[derive(Default)]
pub struct VMBuilder {
    limits: FuelLimits,
    registers: RegisterBank,
}

impl VMBuilder {
    /// Create a new VM builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fuel limits.
    pub fn limits(mut self, limits: FuelLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Set the execution fuel limit.
    pub fn exec_fuel(mut self, fuel: u64) -> Self {
        self.limits = self.limits.exec_fuel(fuel);
        self
    }

    /// Start from preloaded registers instead of empty ones.
    pub fn registers(mut self, registers: RegisterBank) -> Self {
        self.registers = registers;
        self
    }

    /// Build the VM.
    pub fn build(self) -> VM {
        VM {
            registers: self.registers,
            active: RegisterId::default(),
            ip: 0,
            loop_markers: Vec::new(),
            skip_depth: 0,
            mode: Mode::Running,
            steps: 0,
            limits: self.limits,
        }
    }
}

impl VM {
    /// Create a VM builder.
    pub fn builder() -> VMBuilder {
        VMBuilder::new()
    }

    /// Run `program` to completion.
    ///
    /// This is a convenience method that uses `NoopTracer`, which gets
    /// completely optimized away at compile time.
    pub fn execute<I, O>(
        &mut self,
        program: &Program,
        input: &mut I,
        output: &mut O,
    ) -> Result<(), RuntimeError>
    where
        I: Input + ?Sized,
        O: Output + ?Sized,
    {
        self.execute_with(program, input, output, &mut NoopTracer)
    }

    /// Run `program` to completion with a tracer for debugging.
    ///
    /// Control state (instruction pointer, loop markers, skip mode, step
    /// count) starts fresh; registers and the active selection carry over
    /// from any previous run. On error the VM keeps the state reached at
    /// the failing instruction.
    pub fn execute_with<I, O, T>(
        &mut self,
        program: &Program,
        input: &mut I,
        output: &mut O,
        tracer: &mut T,
    ) -> Result<(), RuntimeError>
    where
        I: Input + ?Sized,
        O: Output + ?Sized,
        T: Tracer,
    {
        self.ip = 0;
        self.loop_markers.clear();
        self.skip_depth = 0;
        self.mode = Mode::Running;
        self.steps = 0;

        while let Some(instr) = program.get(self.ip) {
            self.consume_fuel()?;
            match self.mode {
                Mode::Skipping => self.scan(instr, tracer),
                Mode::Running => self.step(instr, input, output, tracer)?,
            }
        }

        tracer.trace_halt(self.steps);
        Ok(())
    }

    fn consume_fuel(&mut self) -> Result<(), RuntimeError> {
        if let Some(limit) = self.limits.exec_fuel
            && self.steps >= limit
        {
            return Err(RuntimeError::ExecFuelExhausted(limit));
        }
        self.steps += 1;
        Ok(())
    }

    /// Skip-mode step: only loop brackets are significant.
    fn scan<T: Tracer>(&mut self, instr: Instruction, tracer: &mut T) {
        tracer.trace_skip(self.ip, instr, self.skip_depth);
        match instr {
            Instruction::LoopOpen => self.skip_depth += 1,
            Instruction::LoopClose if self.skip_depth == self.loop_markers.len() => {
                self.mode = Mode::Running;
                tracer.trace_skip_end(self.ip);
            }
            Instruction::LoopClose => self.skip_depth -= 1,
            _ => {}
        }
        self.ip += 1;
    }

    fn step<I, O, T>(
        &mut self,
        instr: Instruction,
        input: &mut I,
        output: &mut O,
        tracer: &mut T,
    ) -> Result<(), RuntimeError>
    where
        I: Input + ?Sized,
        O: Output + ?Sized,
        T: Tracer,
    {
        tracer.trace_instruction(self.ip, instr, self.active);

        match instr {
            Instruction::LoopOpen => self.exec_loop_open(tracer),
            // The jump lands on the `?` itself, so no advance.
            Instruction::LoopClose => return self.exec_loop_close(tracer),
            Instruction::Break => self.exec_break(tracer),
            Instruction::Nop(_) => {}
            Instruction::Transfer(target) => {
                if self.registers.transfer(self.active, target) {
                    tracer.trace_register(target, self.registers.get(target));
                }
            }
            Instruction::Select(id) => self.active = id,
            _ if instr.is_input() => self.exec_input(instr, input)?,
            Instruction::PrintInt | Instruction::PrintFloat | Instruction::PrintChar => {
                self.exec_output(instr, output)?;
            }
            _ => self.exec_register_op(instr)?,
        }

        if !matches!(instr, Instruction::LoopOpen | Instruction::Break | Instruction::Nop(_)) {
            tracer.trace_register(self.active, self.registers.get(self.active));
        }
        self.ip += 1;
        Ok(())
    }

    fn exec_loop_open<T: Tracer>(&mut self, tracer: &mut T) {
        let condition = self.registers.get_mut(self.active).pop_front();
        tracer.trace_register(self.active, self.registers.get(self.active));

        if condition.is_some_and(Value::is_truthy) {
            self.loop_markers.push(self.ip);
            self.skip_depth += 1;
            tracer.trace_loop_enter(self.ip, self.loop_markers.len());
        } else {
            self.mode = Mode::Skipping;
            tracer.trace_loop_skip(self.ip);
        }
    }

    fn exec_loop_close<T: Tracer>(&mut self, tracer: &mut T) -> Result<(), RuntimeError> {
        let Some(target) = self.loop_markers.pop() else {
            return Err(RuntimeError::UnmatchedLoopClose { ip: self.ip });
        };
        self.skip_depth -= 1;
        tracer.trace_loop_back(self.ip, target);
        self.ip = target;
        Ok(())
    }

    /// Leave the innermost loop: drop its marker and skip past its close.
    fn exec_break<T: Tracer>(&mut self, tracer: &mut T) {
        if self.loop_markers.pop().is_some() {
            self.skip_depth -= 1;
        }
        self.mode = Mode::Skipping;
        tracer.trace_break(self.ip);
    }

    /// Stack shuffling, literals and arithmetic on the active register.
    fn exec_register_op(&mut self, instr: Instruction) -> Result<(), RuntimeError> {
        let ip = self.ip;
        let reg = self.registers.get_mut(self.active);

        match instr {
            Instruction::Digit(d) => reg.push_front(Value::Integer(i64::from(d))),
            Instruction::Dup => {
                reg.dup();
            }
            Instruction::Swap => {
                reg.swap();
            }
            Instruction::RotateToFront => {
                reg.rotate_to_front();
            }
            Instruction::RotateToBack => {
                reg.rotate_to_back();
            }
            Instruction::Drop => {
                reg.pop_front();
            }
            Instruction::Not => {
                if let Some(a) = reg.pop_front() {
                    reg.push_front(a.logical_not());
                }
            }
            Instruction::Rem => {
                if let Some((a, b)) = reg.pop_pair() {
                    let Some(result) = a.checked_rem(b) else {
                        reg.push_front(a);
                        reg.push_front(b);
                        return Err(RuntimeError::RemainderByZero { ip });
                    };
                    reg.push_front(result);
                }
            }
            _ => {
                let Some(op) = binary_op(instr) else {
                    return Ok(());
                };
                if let Some((a, b)) = reg.pop_pair() {
                    reg.push_front(op(a, b));
                }
            }
        }
        Ok(())
    }

    fn exec_output<O: Output + ?Sized>(
        &mut self,
        instr: Instruction,
        output: &mut O,
    ) -> Result<(), RuntimeError> {
        let Some(value) = self.registers.get_mut(self.active).pop_front() else {
            return Ok(());
        };
        match instr {
            Instruction::PrintInt => output.write_int(value.as_int())?,
            Instruction::PrintFloat => output.write_float(value.as_float())?,
            _ => output.write_char(value.as_int() as u8)?,
        }
        Ok(())
    }

    fn exec_input<I: Input + ?Sized>(
        &mut self,
        instr: Instruction,
        input: &mut I,
    ) -> Result<(), RuntimeError> {
        let reg = self.registers.get_mut(self.active);
        match instr {
            Instruction::ReadNumber => {
                let value = match input.read_token()? {
                    Some(token) => Value::parse_token(&String::from_utf8_lossy(&token)),
                    None => Value::Integer(-1),
                };
                reg.push_front(value);
            }
            Instruction::ReadChar => {
                let code = input.read_byte()?.map_or(-1, i64::from);
                reg.push_front(Value::Integer(code));
            }
            _ => {
                let Some(delimiter) = reg.pop_front() else {
                    return Ok(());
                };
                // Only an exact zero selects token mode; other values use their low byte.
                let bytes = match delimiter.as_int() {
                    0 => input.read_token()?.unwrap_or_default(),
                    code => input.read_until(code as u8)?,
                };
                reg.push_front(Value::Integer(0));
                for &byte in bytes.iter().rev() {
                    reg.push_front(Value::Integer(i64::from(byte)));
                }
            }
        }
        Ok(())
    }

    /// All 26 registers.
    pub fn registers(&self) -> &RegisterBank {
        &self.registers
    }

    pub fn registers_mut(&mut self) -> &mut RegisterBank {
        &mut self.registers
    }

    /// Register selected by the most recent lowercase letter.
    pub fn active_register(&self) -> RegisterId {
        self.active
    }

    pub fn ip(&self) -> usize {
        self.ip
    }

    /// Number of currently open loops.
    pub fn loop_depth(&self) -> usize {
        self.loop_markers.len()
    }

    pub fn is_skipping(&self) -> bool {
        self.mode == Mode::Skipping
    }

    /// Steps consumed by the last run, skipped instructions included.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn limits(&self) -> FuelLimits {
        self.limits
    }
}

impl Default for VM {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Pure two-operand operators; `a` is the lower operand, `b` was on top.
fn binary_op(instr: Instruction) -> Option<fn(Value, Value) -> Value> {
    let op: fn(Value, Value) -> Value = match instr {
        Instruction::Add => |a, b| a + b,
        Instruction::Sub => |a, b| a - b,
        Instruction::Mul => |a, b| a * b,
        Instruction::Div => Value::divide,
        Instruction::Eq => Value::equals,
        Instruction::Gt => Value::greater_than,
        Instruction::Lt => Value::less_than,
        Instruction::And => Value::logical_and,
        Instruction::Or => Value::logical_or,
        _ => return None,
    };
    Some(op)
}
