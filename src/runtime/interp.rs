use std::collections::HashMap;
use std::io::Write;

use tracing::{debug, trace};

use super::runtime_error::RuntimeError;
use crate::frontend::decode::{decode_number, decode_text, is_symbol_line, quad_count};
use crate::lang::header::{CompareOp, Header, LoopKind};
use crate::lang::program::{Program, SourceLine};
use crate::lang::value::Value;

#[derive(Debug, Clone)]
pub struct InterpConfig {
    /// Upper bound on dispatches plus loop iterations. `None` runs forever
    /// if the program does.
    pub max_steps: Option<usize>,
    pub max_depth: usize,
}

impl Default for InterpConfig {
    fn default() -> Self {
        InterpConfig {
            max_steps: None,
            max_depth: 256,
        }
    }
}

/// State private to one sub-program run.
///
/// The variable store is reserved for the `Variables` header; nothing
/// writes it yet. Each loop body run starts with an empty one.
#[derive(Debug, Default)]
struct Frame {
    vars: HashMap<String, Value>,
}

pub struct Interpreter<W: Write> {
    out: W,
    config: InterpConfig,
    depth: usize,
    steps: usize,
}

type Result<T> = std::result::Result<T, RuntimeError>;

impl<W: Write> Interpreter<W> {
    pub fn new(out: W) -> Self {
        Self::with_config(out, InterpConfig::default())
    }

    pub fn with_config(out: W, config: InterpConfig) -> Self {
        Interpreter {
            out,
            config,
            depth: 0,
            steps: 0,
        }
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Hand back the output sink, e.g. to inspect captured output.
    pub fn into_output(self) -> W {
        self.out
    }

    pub fn run(&mut self, program: &Program) -> Result<()> {
        self.execute(&program.lines)?;
        self.out.flush()?;
        Ok(())
    }

    /// Run `lines` as an independent program: fresh instruction pointer and
    /// fresh variable store. Loop bodies re-enter here once per iteration.
    #[tracing::instrument(level = "debug", skip_all, fields(lines = lines.len(), depth = self.depth))]
    pub fn execute(&mut self, lines: &[SourceLine]) -> Result<()> {
        if self.depth >= self.config.max_depth {
            return Err(RuntimeError::DepthLimit(self.config.max_depth));
        }
        self.depth += 1;
        let result = self.execute_frame(lines, &mut Frame::default());
        self.depth -= 1;
        result
    }

    fn execute_frame(&mut self, lines: &[SourceLine], frame: &mut Frame) -> Result<()> {
        let mut ip = 0;
        while ip < lines.len() {
            self.check_limits()?;
            ip = self.dispatch(lines, ip)?;
        }
        trace!(vars = frame.vars.len(), "sub-program finished");
        Ok(())
    }

    fn check_limits(&mut self) -> Result<()> {
        self.steps += 1;
        if let Some(max) = self.config.max_steps {
            if self.steps > max {
                return Err(RuntimeError::StepLimit(max));
            }
        }
        Ok(())
    }

    /// Execute the line at `ip` and return the next instruction pointer.
    fn dispatch(&mut self, lines: &[SourceLine], ip: usize) -> Result<usize> {
        let line = &lines[ip];
        let header = Header::classify(&line.text);
        trace!(line = line.number, ?header, "dispatch");

        match header {
            Some(Header::Print) => self.exec_print(lines, ip),
            Some(Header::Loops) => self.exec_loops(lines, ip),
            // Data lines and headers without behavior are stepped over.
            _ => {
                trace!(line = line.number, "skip");
                Ok(ip + 1)
            }
        }
    }

    fn exec_print(&mut self, lines: &[SourceLine], ip: usize) -> Result<usize> {
        let payload = operand(lines, ip, Header::Print, "text to print")?;

        let (text, next) = if Header::classify(&payload.text) == Some(Header::Ascii) {
            match eval_value(lines, ip + 1)? {
                (Value::Text(text), next) => (text, next),
                (other, next) => (other.to_string(), next),
            }
        } else {
            let text = decode_text(&payload.text).map_err(RuntimeError::decode(payload.number))?;
            (text, ip + 2)
        };

        writeln!(self.out, "{}", text)?;
        Ok(next)
    }

    fn exec_loops(&mut self, lines: &[SourceLine], ip: usize) -> Result<usize> {
        let subtype_line = operand(lines, ip, Header::Loops, "a loop subtype")?;
        let subtype = quad_count(&subtype_line.text).ok_or(RuntimeError::MalformedSubtype {
            line: subtype_line.number,
            len: subtype_line.text.trim().chars().count(),
        })?;

        match LoopKind::from_reps(subtype) {
            Some(LoopKind::While) => self.exec_while(lines, ip + 2),
            // A stray end marker is a no-op.
            Some(LoopKind::End) => Ok(ip + 2),
            Some(LoopKind::For) | None => Err(RuntimeError::UnsupportedLoopSubtype {
                line: subtype_line.number,
                subtype,
            }),
        }
    }

    /// `start` points just past the While subtype line.
    ///
    /// The guard is computed once from the literal operands and never
    /// re-evaluated, so the body runs zero times or forever.
    fn exec_while(&mut self, lines: &[SourceLine], start: usize) -> Result<usize> {
        let while_line = lines[start - 1].number;
        let cmp_line = lines.get(start).ok_or(RuntimeError::TruncatedInput {
            line: while_line,
            header: Header::Loops,
            expected: "a Comparison header",
        })?;
        let Some(cmp) = Header::classify(&cmp_line.text).filter(|h| *h == Header::Comparison)
        else {
            return Err(RuntimeError::MissingComparison {
                line: cmp_line.number,
            });
        };
        let op = CompareOp::from_reps(cmp.reps());

        let (left, next) = eval_value(lines, start + 1)?;
        let (right, body_start) = eval_value(lines, next)?;

        let body_end = find_loop_end(lines, body_start)
            .ok_or(RuntimeError::UnterminatedLoop { line: while_line })?;

        let guard = op
            .apply(&left, &right)
            .ok_or(RuntimeError::IncomparableValues {
                line: cmp_line.number,
                op: op.symbol(),
                left: left.type_name(),
                right: right.type_name(),
            })?;

        let body = &lines[body_start..body_end];
        debug!(
            line = while_line,
            %op,
            %left,
            %right,
            guard,
            body_lines = body.len(),
            "while"
        );

        if guard {
            loop {
                self.check_limits()?;
                self.execute(body)?;
            }
        }

        Ok(body_end + 2)
    }
}

/// The line following the header at `ip`.
fn operand<'a>(
    lines: &'a [SourceLine],
    ip: usize,
    header: Header,
    expected: &'static str,
) -> Result<&'a SourceLine> {
    lines.get(ip + 1).ok_or(RuntimeError::TruncatedInput {
        line: lines[ip].number,
        header,
        expected,
    })
}

/// Evaluate the value starting at `i`: a `Numbers` or `ASCII` header with
/// its data line, or a bare symbol line read as a number.
///
/// Returns the value and the index just past it.
pub fn eval_value(lines: &[SourceLine], i: usize) -> Result<(Value, usize)> {
    let Some(line) = lines.get(i) else {
        // Only a While guard asks for a value past the end of its lines.
        return Err(RuntimeError::TruncatedInput {
            line: i.checked_sub(1).and_then(|p| lines.get(p)).map_or(0, |l| l.number),
            header: Header::Loops,
            expected: "a value",
        });
    };

    match Header::classify(&line.text) {
        Some(Header::Numbers) => {
            let data = operand(lines, i, Header::Numbers, "a number")?;
            let n = decode_number(&data.text).map_err(RuntimeError::decode(data.number))?;
            Ok((Value::Integer(n), i + 2))
        }
        Some(Header::Ascii) => {
            let data = operand(lines, i, Header::Ascii, "text")?;
            let text = decode_text(&data.text).map_err(RuntimeError::decode(data.number))?;
            Ok((Value::Text(text), i + 2))
        }
        _ if is_symbol_line(&line.text) => {
            let n = decode_number(&line.text).map_err(RuntimeError::decode(line.number))?;
            Ok((Value::Integer(n), i + 1))
        }
        _ => Err(RuntimeError::UninterpretableValue {
            line: line.number,
            text: line.text.trim().to_string(),
        }),
    }
}

/// Index of the first `Loops` header at or after `from` whose next line
/// is an End subtype.
///
/// The scan is flat: a nested loop's own end marker closes the outer body.
pub fn find_loop_end(lines: &[SourceLine], from: usize) -> Option<usize> {
    (from..lines.len()).find(|&i| {
        Header::classify(&lines[i].text) == Some(Header::Loops)
            && lines
                .get(i + 1)
                .and_then(|next| quad_count(&next.text))
                .and_then(LoopKind::from_reps)
                == Some(LoopKind::End)
    })
}
