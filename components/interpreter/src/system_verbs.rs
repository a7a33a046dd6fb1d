//! Verbs every resumable host gets
//!
//! | verb           | stack effect | behaviour                               |
//! |----------------|--------------|-----------------------------------------|
//! | `getsenderref` | `-- v`       | sender register of the calling frame    |
//! | `getsourceref` | `-- v`       | source register of the calling frame    |
//! | `getparam`     | `n -- v`     | parameter register `n` (`Void` if > 3)  |
//! | `returnex`     | `v --`       | store `v` in the frame's return register|
//! | `suspend`      | `--`         | yield to the host                       |

use crate::signal::Flow;
use crate::verbs::{ResumableVerbTable, VerbContext};
use core_types::{Value, VmResult};

/// Register the system verbs into `verbs`
pub fn register(verbs: &mut ResumableVerbTable) {
    verbs.add("getsenderref", get_sender_ref);
    verbs.add("getsourceref", get_source_ref);
    verbs.add("getparam", get_param);
    verbs.add("returnex", return_ex);
    verbs.add("suspend", |_| Ok(Flow::Suspend));
}

fn get_sender_ref(ctx: &mut VerbContext<'_>) -> VmResult<Flow> {
    Ok(Flow::Return(ctx.frame()?.sender.clone()))
}

fn get_source_ref(ctx: &mut VerbContext<'_>) -> VmResult<Flow> {
    Ok(Flow::Return(ctx.frame()?.source.clone()))
}

fn get_param(ctx: &mut VerbContext<'_>) -> VmResult<Flow> {
    let n = ctx.pop_int()?;
    let value = usize::try_from(n)
        .map(|n| ctx.continuation.frame().map(|f| f.param(n)))
        .ok()
        .flatten()
        .unwrap_or_default();
    Ok(Flow::Return(value))
}

fn return_ex(ctx: &mut VerbContext<'_>) -> VmResult<Flow> {
    let value = ctx.pop()?;
    ctx.frame_mut()?.set_return_value(value);
    Ok(Flow::Return(Value::Void))
}
