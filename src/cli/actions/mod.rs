pub mod keygen;
pub mod server;

#[derive(Debug)]
pub enum Action {
    Server(server::Args),
    Keygen,
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        match self {
            Self::Server(args) => server::execute(args).await,
            Self::Keygen => keygen::execute(),
        }
    }
}
