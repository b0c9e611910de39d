//! Decode loop
//!
//! Percorre o programa uma vez, linearmente, despachando cada token pela
//! tabela de opcodes. O cursor é o único estado mutável compartilhado e
//! pertence exclusivamente ao [`Disassembler`].

use crate::config::DecodeConfig;
use crate::control::{self, BranchPolicy, Condition};
use crate::error::{DecodeError, DecodeResult};
use crate::listing::{AsmLine, ListingWriter};
use crate::opcode::Instruction;
use crate::operand::{self, Registers};
use crate::stack::{BinaryOp, Value, WorkingStack};
use crate::token::{Program, Token};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, trace, warn};

/// Notice written when a halt instruction ends the run
pub const HALT_NOTICE: &str = "Done.";

/// Resultado de um passo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Halt,
}

/// How a successful run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    #[default]
    EndOfStream,
    Halted,
}

/// Statistics for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DecodeReport {
    pub outcome: Outcome,
    /// Tokens dispatched, markers and closed block terminators included
    pub steps: usize,
    /// Assembly lines emitted
    pub lines: usize,
    /// Net stack depth of the emitted code, in 4-byte slots
    pub net_stack_depth: i64,
    /// Dispatch count per instruction
    pub instructions: BTreeMap<&'static str, usize>,
}

/// Disassembler estático
pub struct Disassembler<'p, W: ListingWriter> {
    program: &'p Program,
    writer: W,
    policy: BranchPolicy,
    max_steps: usize,
    cursor: usize,
    stack: WorkingStack,
    registers: Registers,
    // taken blocks whose terminator has not been reached yet
    open_blocks: usize,
    report: DecodeReport,
}

impl<'p, W: ListingWriter> Disassembler<'p, W> {
    /// Cria disassembler com cursor na posição 1
    pub fn new(program: &'p Program, writer: W, config: &DecodeConfig) -> Self {
        Self {
            program,
            writer,
            policy: config.branch_policy,
            max_steps: config.max_steps,
            cursor: 1,
            stack: WorkingStack::with_seed(&config.initial_stack),
            registers: Registers::new(),
            open_blocks: 0,
            report: DecodeReport::default(),
        }
    }

    /// Decodifica até halt ou fim do programa
    pub fn run(&mut self) -> DecodeResult<DecodeReport> {
        debug!(tokens = self.program.len() - 1, "decode started");

        self.report.outcome = Outcome::EndOfStream;
        while self.cursor < self.program.len() {
            if self.step()? == Flow::Halt {
                self.report.outcome = Outcome::Halted;
                break;
            }
        }

        if self.report.outcome == Outcome::EndOfStream && self.open_blocks > 0 {
            return Err(DecodeError::out_of_bounds(self.cursor, self.program.len()));
        }

        debug!(
            steps = self.report.steps,
            lines = self.report.lines,
            outcome = ?self.report.outcome,
            "decode finished"
        );
        Ok(self.report.clone())
    }

    /// Executa um único passo: lê o token no cursor, avança e despacha
    pub fn step(&mut self) -> DecodeResult<Flow> {
        let position = self.cursor;
        if self.report.steps >= self.max_steps {
            return Err(DecodeError::StepLimitExceeded {
                limit: self.max_steps,
                position,
            });
        }
        self.report.steps += 1;

        let program = self.program;
        let token = match program.get(position) {
            Some(Token::Sentinel) | None => {
                return Err(DecodeError::out_of_bounds(position, program.len()));
            }
            Some(token) => token,
        };
        self.cursor += 1;

        match token {
            Token::Instruction(ins) => self.dispatch(*ins, position),
            // labels are structural, straight-line code steps over them
            Token::Marker(name) => {
                trace!(position, label = %name, "marker");
                Ok(Flow::Continue)
            }
            Token::BlockEnd if self.open_blocks > 0 => {
                self.open_blocks -= 1;
                trace!(position, depth = self.open_blocks, "block closed");
                Ok(Flow::Continue)
            }
            other => Err(DecodeError::UnknownInstruction {
                token: other.to_string(),
                position,
            }),
        }
    }

    fn dispatch(&mut self, ins: Instruction, position: usize) -> DecodeResult<Flow> {
        debug!(position, instruction = ins.mnemonic(), "dispatch");
        *self.report.instructions.entry(ins.mnemonic()).or_insert(0) += 1;
        self.report.net_stack_depth += ins.stack_effect();

        match ins {
            Instruction::Add => {
                self.emit("add", "(%esp),4(%esp)")?;
                self.pop_out()?;
            }
            Instruction::Sub => {
                self.emit("sub", "(%esp),4(%esp)")?;
                self.pop_out()?;
            }
            Instruction::PopOut => self.pop_out()?,
            Instruction::Clone => {
                self.emit("sub", "$4,%esp")?;
                self.emit("mov", "4(%esp),(%esp)")?;
            }

            Instruction::Multiply => self.transform(BinaryOp::Multiply, position),
            Instruction::Divide => self.transform(BinaryOp::Divide, position),
            Instruction::Modulo => self.transform(BinaryOp::Modulo, position),
            Instruction::Xor => self.transform(BinaryOp::Xor, position),

            Instruction::Push => {
                let reg = operand::register_at(self.program, self.cursor)?;
                self.cursor += 1;
                self.emit("push", reg.name())?;
            }
            Instruction::Pop => {
                // implicit in the calling convention of the emitted code
                let reg = operand::register_at(self.program, self.cursor)?;
                self.cursor += 1;
                let value = self.stack.pop();
                self.registers.set(reg, value);
            }
            Instruction::Load => {
                let reg = operand::register_at(self.program, self.cursor)?;
                let imm = operand::immediate_at(self.program, self.cursor + 1)?;
                self.cursor = imm.end + 1;
                self.registers.set(reg, Value::Known(imm.value));
                self.emit("mov", format!("${},{}", imm.value, reg.name()))?;
            }

            Instruction::IfZero => return self.conditional(Condition::IfZero, position),
            Instruction::IfNotZero => return self.conditional(Condition::IfNotZero, position),
            Instruction::JumpTo => {
                self.jump_to(position)?;
                self.leave_blocks();
            }
            Instruction::JumpTop => {
                let target = self.stack.pop();
                self.cursor = control::resolve_return(self.program, target, position)?;
                trace!(from = position, to = self.cursor, "computed return");
                self.leave_blocks();
            }

            Instruction::PrintTop => self.print_top(position)?,
            Instruction::Halt => {
                self.writer.notice(HALT_NOTICE)?;
                return Ok(Flow::Halt);
            }
        }

        Ok(Flow::Continue)
    }

    fn emit(&mut self, mnemonic: &'static str, operands: impl Into<String>) -> DecodeResult<()> {
        self.writer.instruction(&AsmLine::new(mnemonic, operands))?;
        self.report.lines += 1;
        Ok(())
    }

    fn pop_out(&mut self) -> DecodeResult<()> {
        self.emit("add", "$4,%esp")
    }

    /// Pop two, push `second ⊙ first`. Nothing is emitted.
    fn transform(&mut self, op: BinaryOp, position: usize) {
        let first = self.stack.pop();
        let second = self.stack.pop();
        let result = op.combine(second, first);

        if first.is_known() && second.is_known() && !result.is_known() {
            warn!(position, ?op, ?second, ?first, "arithmetic fault, result is unknown");
        }
        self.stack.push(result);
    }

    fn conditional(&mut self, condition: Condition, position: usize) -> DecodeResult<Flow> {
        let top = self.stack.peek();
        if !top.is_known() {
            debug!(position, ?condition, policy = ?self.policy, "condition on unknown value");
        }

        if condition.holds(top, self.policy) {
            self.open_blocks += 1;
            trace!(position, ?condition, depth = self.open_blocks, "block entered");
            return Ok(Flow::Continue);
        }

        let end = self.program.find_first_endif(self.cursor)?;
        trace!(position, ?condition, to = end + 1, "block skipped");
        self.cursor = end + 1;
        Ok(Flow::Continue)
    }

    /// A jump abandons every taken block it leaves from
    fn leave_blocks(&mut self) {
        if self.open_blocks > 0 {
            trace!(depth = self.open_blocks, "blocks left by jump");
            self.open_blocks = 0;
        }
    }

    fn jump_to(&mut self, position: usize) -> DecodeResult<()> {
        let program = self.program;
        let label = match control::jump_target_at(program, self.cursor) {
            Ok(label) => label,
            Err(err) => {
                if let DecodeError::InvalidJumpTarget { token, .. } = &err {
                    self.writer.notice(&format!("Incorrect symbol : {}", token))?;
                }
                return Err(err);
            }
        };

        self.cursor = control::resolve_label(program, label, position)?;
        trace!(from = position, to = self.cursor, label, "jump");
        Ok(())
    }

    fn print_top(&mut self, position: usize) -> DecodeResult<()> {
        match self.stack.pop() {
            Value::Known(value) => {
                let ch = u32::try_from(value)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or(DecodeError::InvalidCodePoint { value, position })?;
                self.writer.character(ch)?;
            }
            Value::Unknown => warn!(position, "print of unknown value skipped"),
        }
        Ok(())
    }

    /// Posição atual do cursor
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn stack(&self) -> &WorkingStack {
        &self.stack
    }

    /// Taken blocks not yet closed by their terminator
    pub fn open_blocks(&self) -> usize {
        self.open_blocks
    }

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    pub fn report(&self) -> &DecodeReport {
        &self.report
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}
