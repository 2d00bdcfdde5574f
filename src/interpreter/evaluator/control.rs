use std::io::Write;

use crate::{
    ast::{Expr, StatementList},
    interpreter::evaluator::{
        core::{EvalResult, Flow, Interpreter},
        stack::FrameKind,
    },
};

impl<W: Write> Interpreter<W> {
    /// Evaluates a boolean condition.
    pub(crate) fn eval_condition(&mut self, condition: &Expr) -> EvalResult<bool> {
        let (line, column) = condition.position();
        self.eval_value(condition)?
            .as_bool("condition", line, column)
    }

    /// Executes the first branch whose condition holds, or the `else` body.
    ///
    /// Conditions are evaluated in order in the current frame. The chosen
    /// body runs in its own `conditional` frame; at most one body runs.
    pub(crate) fn exec_conditional(&mut self,
                                   branches: &[(Expr, StatementList)],
                                   else_body: Option<&StatementList>)
                                   -> EvalResult<Flow> {
        for (index, (condition, body)) in branches.iter().enumerate() {
            if self.eval_condition(condition)? {
                let name = if index == 0 { "if" } else { "elseif" };
                return self.in_frame(name, FrameKind::Conditional, |this| {
                               this.exec_statements(body)
                           });
            }
        }

        match else_body {
            Some(body) => {
                self.in_frame("else", FrameKind::Conditional, |this| this.exec_statements(body))
            },
            None => Ok(Flow::Normal),
        }
    }

    /// Executes a `while` loop.
    ///
    /// The condition is evaluated before every iteration, and every
    /// iteration runs in a fresh `while` frame, so a loop whose condition is
    /// false at once pushes no frame at all.
    pub(crate) fn exec_while(&mut self,
                             condition: &Expr,
                             body: &StatementList)
                             -> EvalResult<Flow> {
        while self.eval_condition(condition)? {
            let flow = self.in_frame("while", FrameKind::While, |this| this.exec_statements(body))?;
            match flow {
                Flow::Break => break,
                Flow::Normal | Flow::Continue => {},
                Flow::Return(value) => return Ok(Flow::Return(value)),
            }
        }
        Ok(Flow::Normal)
    }
}
