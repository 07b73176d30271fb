mod command;
mod record;
mod schema;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
