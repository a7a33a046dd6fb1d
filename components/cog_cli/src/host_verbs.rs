//! Verbs the command-line host provides
//!
//! `print` pops any value and writes its display form; `printint` pops a
//! value coerced to an integer. Both leave `Void` as their result. The
//! resumable table also carries the system verbs.

use core_types::Value;
use interpreter::{system_verbs, Flow, ResumableVerbTable, TransientVerbTable};
use std::cell::RefCell;
use std::rc::Rc;

/// Output sink shared by the host verbs
///
/// Echoing consoles write straight to stdout; capturing consoles keep the
/// lines for inspection.
#[derive(Debug, Clone, Default)]
pub struct Console {
    lines: Rc<RefCell<Vec<String>>>,
    echo: bool,
}

impl Console {
    /// Console writing to stdout
    pub fn stdout() -> Self {
        Self {
            lines: Rc::default(),
            echo: true,
        }
    }

    /// Console recording output
    pub fn capture() -> Self {
        Self::default()
    }

    /// Emit one line
    pub fn write_line(&self, line: String) {
        if self.echo {
            println!("{}", line);
        } else {
            self.lines.borrow_mut().push(line);
        }
    }

    /// Lines recorded so far
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }
}

/// Host verbs for the transient engine
pub fn transient(console: &Console) -> TransientVerbTable {
    let mut verbs = TransientVerbTable::new();

    let out = console.clone();
    verbs.add("print", move |stack| {
        out.write_line(stack.pop()?.to_string());
        Ok(Value::Void)
    });

    let out = console.clone();
    verbs.add("printint", move |stack| {
        out.write_line(stack.pop_int()?.to_string());
        Ok(Value::Void)
    });

    verbs
}

/// System verbs plus host verbs for the resumable engine
pub fn resumable(console: &Console) -> ResumableVerbTable {
    let mut verbs = ResumableVerbTable::new();
    system_verbs::register(&mut verbs);

    let out = console.clone();
    verbs.add("print", move |ctx| {
        out.write_line(ctx.pop()?.to_string());
        Ok(Flow::Return(Value::Void))
    });

    let out = console.clone();
    verbs.add("printint", move |ctx| {
        out.write_line(ctx.pop_int()?.to_string());
        Ok(Flow::Return(Value::Void))
    });

    verbs
}
