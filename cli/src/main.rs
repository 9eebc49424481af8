use anyhow::Result;

fn main() -> Result<()> {
    slovobor_cli::run()
}
