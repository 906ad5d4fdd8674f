//! Track the clients of the running window manager, logging everything that happens.
//!
//! Nothing is ever moved: this is useful for checking which windows would be tiled.
use tracing::info;
use tracing_subscriber::{self, prelude::*};
use tyle::{
    core::Client,
    tiler::Tiler,
    x::{property::Desktop, XConn},
    x11rb::X11rbConnection,
    Config, Result, Tracker,
};

#[derive(Debug, Default)]
struct LoggingTiler;

impl<X: XConn> Tiler<X> for LoggingTiler {
    fn client_added(&mut self, client: &Client, _: &X) -> Result<()> {
        info!(id = %client.id(), name = client.name(), desktop = ?client.desktop(), "client added");
        Ok(())
    }

    fn client_removed(&mut self, client: &Client, _: &X) -> Result<()> {
        info!(id = %client.id(), name = client.name(), "client removed");
        Ok(())
    }

    fn client_moved(&mut self, client: &Client, x: &X) -> Result<()> {
        let r = x.client_geometry(client.id())?;
        info!(id = %client.id(), name = client.name(), ?r, "client moved by the user");
        Ok(())
    }

    fn client_desktop_changed(&mut self, client: &Client, old: Option<Desktop>, _: &X) -> Result<()> {
        info!(id = %client.id(), ?old, new = ?client.desktop(), "client changed desktop");
        Ok(())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("debug")
        .finish()
        .init();

    let conn = X11rbConnection::new()?;
    let tracker = Tracker::new(Config::default(), conn, LoggingTiler);

    tracker.run()
}
