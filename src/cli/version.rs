/// Display version information
pub fn execute() {
    println!("votebook {}", env!("CARGO_PKG_VERSION"));
    println!("Operator CLI for the votebook proposal ledger");
}
