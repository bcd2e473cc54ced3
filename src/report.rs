use crate::config::GatherConfig;
use crate::context::{ContextGatherer, SessionContext};
use crate::error::{AppError, AppResult};
use crate::git::executor::GitExecutor;
use std::any::Any;
use std::io::Write;
use std::panic::{self, AssertUnwindSafe};
use tracing::error;

/// Exit status for a written report, warnings included
pub const EXIT_OK: u8 = 0;

/// Exit status when only the fallback report could be produced
pub const EXIT_FAULT: u8 = 1;

/// Gather the session context for `config` using real git
pub fn gather(config: &GatherConfig) -> SessionContext {
    let executor = GitExecutor::from_config(config);
    ContextGatherer::new(executor, config.clone()).gather()
}

/// Serialize a context with 2-space indentation
pub fn render(context: &SessionContext) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(context)?)
}

/// Run `gather`, write its report to `out` and return the exit status
///
/// A panic inside `gather` or a serialization error ends in the fallback
/// report and `EXIT_FAULT`. A failed write also returns `EXIT_FAULT`, but
/// writes nothing more: part of the report may already be on `out`.
pub fn emit<W, F>(out: &mut W, gather: F) -> u8
where
    W: Write,
    F: FnOnce() -> SessionContext,
{
    let json = match gather_rendered(gather) {
        Ok(json) => json,
        Err(fault) => {
            emit_fallback(out, &fault);
            return EXIT_FAULT;
        }
    };

    match write_document(out, &json) {
        Ok(()) => EXIT_OK,
        Err(e) => {
            error!(error = %e, "failed to write report");
            EXIT_FAULT
        }
    }
}

/// Write the minimal report describing `fault`
pub fn emit_fallback<W: Write>(out: &mut W, fault: &AppError) {
    error!(error = %fault, "session init failed");

    let fallback = SessionContext::fallback(&fault.to_string());
    if let Ok(json) = render(&fallback) {
        let _ = write_document(out, &json);
    }
}

fn gather_rendered<F>(gather: F) -> AppResult<String>
where
    F: FnOnce() -> SessionContext,
{
    let context = panic::catch_unwind(AssertUnwindSafe(gather))
        .map_err(|payload| AppError::Panic(panic_message(payload.as_ref())))?;

    render(&context)
}

fn write_document<W: Write>(out: &mut W, json: &str) -> AppResult<()> {
    let mut document = String::with_capacity(json.len() + 1);
    document.push_str(json);
    document.push('\n');

    out.write_all(document.as_bytes())?;
    out.flush()?;

    Ok(())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
