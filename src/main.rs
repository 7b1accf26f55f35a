fn main() -> std::process::ExitCode {
    tikvault_lib::run()
}
