use std::process::ExitCode;

fn main() -> ExitCode {
    match tenderdigest_lib::run() {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Tender processing aborted");
            ExitCode::FAILURE
        }
    }
}
