fn main() {
    if let Err(err) = iop_chaininfo::run_entry() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
