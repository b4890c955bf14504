fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    crowns_cui::init_file_logging()?;
    crowns_cui::run_with_args(&args)
}
