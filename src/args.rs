use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "autoreel", about = "Generate a Reel from a trending topic and publish it")]
pub struct Args {
    /// Override the trending topic
    #[clap(long)]
    pub topic: Option<String>,
}
