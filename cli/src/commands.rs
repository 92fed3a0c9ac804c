use std::{cell::Cell, cell::RefCell, rc::Rc};

use anyhow::{anyhow, bail};
use gqlpen_client::Client;
use gqlpen_core::{
    keybindings, EventBus, FileStorage, HeaderScope, KeyPress, Keymap, Mutation, Notifier, Outcome, Playground,
    Shortcuts, SidebarView, Store, TracingNotifier,
};
use gqlpen_schema::{render_sdl, NodeId};

use crate::{
    args::{Args, Command, DocsCommand, HeaderAction, HeaderCommand, LogStyle, QueryCommand, SheetCommand},
    config::Config,
    report::{self, ConsoleNotifier},
};

pub(crate) async fn run(args: Args, config: Config) -> anyhow::Result<()> {
    let storage_dir = args
        .storage_dir
        .clone()
        .or_else(|| config.storage_dir.clone())
        .or_else(FileStorage::default_directory)
        .ok_or_else(|| anyhow!("could not find a data directory, set `storage_dir` in the configuration"))?;

    tracing::debug!("playground state in {}", storage_dir.display());

    let notifier: Box<dyn Notifier> = match args.log_style {
        LogStyle::Json => Box::new(TracingNotifier),
        LogStyle::Pretty | LogStyle::Text => Box::new(ConsoleNotifier),
    };

    let store = Store::load(FileStorage::new(storage_dir));
    let client = Client::new(&config.client)?;
    let playground = Playground::new(store, client, notifier);

    execute(playground, args.command, &config.keybindings).await
}

async fn execute(mut playground: Playground, command: Command, keymap: &Keymap) -> anyhow::Result<()> {
    let result = match command {
        Command::Introspect => introspect(&mut playground).await,
        Command::Query(command) => query(&mut playground, command).await,
        Command::Docs(command) => docs(&mut playground, command).await,
        Command::Sheet(command) => sheet(&mut playground, command),
        Command::Endpoint { url } => endpoint(&mut playground, url),
        Command::Header(command) => header(&mut playground, command),
        Command::Status => {
            status(&playground);
            Ok(())
        }
        Command::Press { keys } => return press(playground, &keys, keymap),
    };

    save_on_exit(&mut playground, result)
}

/// Keeps whatever changed, even when the command failed half way.
fn save_on_exit(playground: &mut Playground, result: anyhow::Result<()>) -> anyhow::Result<()> {
    if playground.confirm_exit_required() {
        playground.save()?;
    }

    result
}

async fn introspect(playground: &mut Playground) -> anyhow::Result<()> {
    let endpoint = playground.store().state().endpoint.clone();
    expect_applied(playground.load_schema().await, "could not load the schema")?;

    if let Some(schema) = playground.schema() {
        println!("{} types from {endpoint}", schema.definition_ids().len());
    }

    Ok(())
}

async fn query(playground: &mut Playground, QueryCommand { sheet, query }: QueryCommand) -> anyhow::Result<()> {
    if let Some(index) = sheet {
        playground.mutate(Mutation::SelectSheet(index))?;
    }

    if let Some(content) = query {
        let index = playground.store().state().active_sheet;
        playground.mutate(Mutation::SetSheetContent { index, content })?;
    }

    let sheet = playground.store().active_sheet();
    if sheet.content.trim().is_empty() {
        let name = sheet.name.clone();
        report::hint("pass a query, or fill the sheet with `gqlpen sheet edit`");
        bail!("sheet `{name}` is empty");
    }

    expect_applied(playground.run_query().await, "could not run the query")?;
    println!("{}", serde_json::to_string_pretty(&playground.store().state().result)?);

    Ok(())
}

async fn docs(playground: &mut Playground, DocsCommand { path, sdl }: DocsCommand) -> anyhow::Result<()> {
    expect_applied(playground.restore_schema().await, "could not load the schema")?;

    if sdl {
        if let Some(schema) = playground.schema() {
            print!("{}", render_sdl(&schema));
        }
        return Ok(());
    }

    playground.open_documentation();
    navigate(playground, &path)?;

    if let Some(page) = playground.documentation() {
        print!("{page}");
    }

    Ok(())
}

/// Follows `path` from the root page. Each segment names a link on the current page, a field
/// by its name alone, or any type of the schema.
fn navigate(playground: &mut Playground, path: &[String]) -> anyhow::Result<()> {
    let Some(schema) = playground.schema() else {
        bail!("no schema is loaded");
    };

    for segment in path {
        let page = playground.navigator().page(&schema);

        let target = page
            .links()
            .into_iter()
            .find(|link| link_matches(&link.label, segment))
            .map(|link| link.target)
            .or_else(|| schema.definition_by_name(segment).map(NodeId::from));

        let Some(target) = target else {
            bail!("`{segment}` is neither a link on the {} page nor a type", page.title);
        };

        if !playground.go_to(target) {
            bail!("`{segment}` is not part of the current schema");
        }
    }

    Ok(())
}

fn link_matches(label: &str, segment: &str) -> bool {
    label == segment || label.strip_prefix(segment).is_some_and(|rest| rest.starts_with('('))
}

fn sheet(playground: &mut Playground, command: SheetCommand) -> anyhow::Result<()> {
    match command {
        SheetCommand::List => {
            let state = playground.store().state();
            for (index, sheet) in state.sheets.iter().enumerate() {
                let marker = if index == state.active_sheet { '*' } else { ' ' };
                println!("{marker} {index} {}", sheet.name);
            }
        }
        SheetCommand::Add => {
            playground.mutate(Mutation::AddSheet)?;
            report::changed("active sheet", &playground.store().active_sheet().name);
        }
        SheetCommand::Select { index } => {
            playground.mutate(Mutation::SelectSheet(index))?;
            report::changed("active sheet", &playground.store().active_sheet().name);
        }
        SheetCommand::Rename { index, name } => playground.mutate(Mutation::RenameSheet { index, name })?,
        SheetCommand::Remove { index } => playground.mutate(Mutation::RemoveSheet(index))?,
        SheetCommand::Edit { index, content } => playground.mutate(Mutation::SetSheetContent { index, content })?,
    }

    Ok(())
}

fn endpoint(playground: &mut Playground, url: Option<String>) -> anyhow::Result<()> {
    let Some(url) = url else {
        println!("{}", playground.store().state().endpoint);
        return Ok(());
    };

    playground.mutate(Mutation::SetEndpoint(url))?;
    report::changed("endpoint", &playground.store().state().endpoint);
    report::hint("run `gqlpen introspect` to load the schema of the new endpoint");

    Ok(())
}

fn header(playground: &mut Playground, HeaderCommand { scope, action }: HeaderCommand) -> anyhow::Result<()> {
    let scope = HeaderScope::from(scope);

    match action {
        HeaderAction::List => {
            for (index, header) in playground.store().headers(scope).iter().enumerate() {
                println!("{index} {}: {}", header.key, header.value);
            }
        }
        HeaderAction::Add { key, value } => {
            playground.mutate(Mutation::AddHeader(scope))?;
            let index = playground.store().headers(scope).len() - 1;
            playground.mutate(Mutation::SetHeaderKey { scope, index, key })?;
            playground.mutate(Mutation::SetHeaderValue { scope, index, value })?;
        }
        HeaderAction::Remove { index } => playground.mutate(Mutation::RemoveHeader { scope, index })?,
    }

    Ok(())
}

fn status(playground: &Playground) {
    let state = playground.store().state();

    println!("endpoint: {}", state.endpoint);
    println!(
        "sheets: {} (active: {})",
        state.sheets.len(),
        playground.store().active_sheet().name
    );
    println!(
        "schema: {}",
        if state.introspection.is_some() {
            "introspected"
        } else {
            "not introspected"
        }
    );

    for scope in [HeaderScope::Global, HeaderScope::Introspection, HeaderScope::Query] {
        println!("{scope} headers: {}", playground.store().headers(scope).len());
    }

    let sidebar = match (state.open_sidebar, state.sidebar) {
        (false, _) => "closed",
        (true, SidebarView::Docs) => "docs",
        (true, SidebarView::Settings) => "settings",
    };
    println!("sidebar: {sidebar}");
}

/// Runs the keyboard shortcuts bound to `keys`, as the editor would on those key presses.
fn press(playground: Playground, keys: &[KeyPress], keymap: &Keymap) -> anyhow::Result<()> {
    let playground = Rc::new(RefCell::new(playground));
    let failures = Rc::new(Cell::new(0_usize));

    let mut bus = EventBus::with_error_handler({
        let failures = failures.clone();
        move |key: &str, error: anyhow::Error| {
            tracing::error!("shortcut {key} failed: {error:#}");
            failures.set(failures.get() + 1);
        }
    });

    let shortcuts = Shortcuts::bind(&mut bus, &playground, keymap);

    for key in keys {
        if keybindings::press(&mut bus, key) == 0 {
            report::hint(&format!("{key} is not bound to any shortcut"));
        }
    }

    shortcuts.unbind(&mut bus);

    let result = match failures.get() {
        0 => Ok(()),
        failed => Err(anyhow!("{failed} shortcuts failed")),
    };

    let mut playground = playground.borrow_mut();
    save_on_exit(&mut playground, result)
}

fn expect_applied(outcome: Outcome, message: &str) -> anyhow::Result<()> {
    match outcome {
        Outcome::Applied | Outcome::Stale => Ok(()),
        Outcome::Failed => Err(anyhow!("{message}")),
    }
}
