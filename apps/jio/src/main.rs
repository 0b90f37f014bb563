use jio_error::PackageManagerError;

fn main() {
    if let Err(err) = jio_cli::run_cli() {
        eprintln!("{} {err}", "error:");
        let code = err
            .downcast_ref::<PackageManagerError>()
            .map_or(1, PackageManagerError::exit_code);
        std::process::exit(code);
    }
}
