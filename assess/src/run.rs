use std::future::Future;

use colored::Colorize;
use jujupy::{
    AgentsStarted, ApplicationReady, Bootstrapped, Condition, GroupReporter, UntilTimeout,
};

use crate::cli::{Cli, Command};
use crate::config::{Config, Settings};
use crate::juju_cmd::JujuCommand;
use crate::{Result, wait_for};

pub async fn run(cli: Cli) -> Result<()> {
    let config = cli.overrides().or(Config::load(cli.config.as_deref())?);
    let settings = config.settings()?;
    tracing::debug!(?settings, "resolved settings");

    let juju = juju_command(&settings);
    match cli.command {
        Command::WaitBootstrapped => wait(&Bootstrapped, || juju.is_reachable(), &settings).await,
        Command::WaitStarted => wait(&AgentsStarted, || juju.status(), &settings).await,
        Command::WaitReady { application } => {
            wait(&ApplicationReady::new(application), || juju.status(), &settings).await
        }
    }
}

fn juju_command(settings: &Settings) -> JujuCommand {
    let mut juju = JujuCommand::new()
        .binary(&settings.juju_bin)
        .timeout(settings.command_timeout);
    if let Some(data) = &settings.juju_data {
        juju = juju.juju_data(data);
    }
    if let Some(model) = &settings.model {
        juju = juju.model(model);
    }
    juju
}

async fn wait<C, F, Fut>(condition: &C, fetch: F, settings: &Settings) -> Result<()>
where
    C: Condition,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<C::Input>>,
{
    let mut reporter = GroupReporter::with_wrap_width(
        std::io::stdout(),
        condition.expected(),
        settings.wrap_width,
    );

    wait_for(
        condition,
        fetch,
        &mut reporter,
        settings.interval,
        UntilTimeout::new(settings.timeout),
    )
    .await?;

    println!("{}", format!("Done waiting for {}", condition.describe()).green());
    Ok(())
}
