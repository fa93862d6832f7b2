mod auth;
mod config;
mod db;
mod error;
mod format;
mod models;
mod quote_gen;
mod ui;

use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use crossterm::{
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::auth::{AdminWhitelistVerifier, AuthError, Identity, WhitelistChange};
use crate::config::Config;
use crate::error::QuoteError;
use crate::models::{Material, QuoteDraft, dates::today};
use crate::quote_gen::QuoteDocumentGenerator;
use crate::ui::{
    components::render_error,
    login::{LoginState, LoginAction, render_login, handle_input as handle_login_input},
    home::{HomeState, HomeAction, MenuEntry, render_home, handle_input as handle_home_input},
    whitelist::{WhitelistState, WhitelistAction, render_whitelist, handle_input as handle_whitelist_input},
    materials::{MaterialsState, MaterialAction, render_materials, handle_input as handle_materials_input},
    material_wizard::{MaterialWizardState, MaterialWizardAction, render_material_wizard, handle_input as handle_material_wizard_input},
    categories::{CategoriesState, CategoryAction, render_categories, handle_input as handle_categories_input},
    clients::{ClientsState, ClientAction, render_clients, handle_input as handle_clients_input},
    client_wizard::{ClientWizardState, ClientWizardAction, render_client_wizard, handle_input as handle_client_wizard_input},
    expenses::{ExpensesState, ExpenseAction, render_expenses, handle_input as handle_expenses_input},
    expense_wizard::{ExpenseWizardState, ExpenseWizardAction, render_expense_wizard, handle_input as handle_expense_wizard_input},
    quotes::{QuotesState, QuoteAction, render_quotes, handle_input as handle_quotes_input},
    quote_wizard::{QuoteWizardState, QuoteWizardAction, render_quote_wizard, handle_input as handle_quote_wizard_input},
    company_wizard::{CompanyWizardState, CompanyWizardAction, render_company_wizard, handle_input as handle_company_wizard_input},
};

// Represents the current screen in the app
enum AppScreen {
    Login,
    Home,
    Whitelist,
    Materials,
    MaterialWizard,
    Categories,
    Clients,
    ClientWizard,
    Expenses,
    ExpenseWizard,
    Quotes,
    QuoteWizard,
    CompanyWizard,
}

// Main application state
struct AppState {
    db: db::Database,
    verifier: AdminWhitelistVerifier,
    generator: QuoteDocumentGenerator,
    identity: Option<Identity>,
    screen: AppScreen,
    // Failure of an action with no inline place to report it
    error_popup: Option<String>,
    login_state: Option<LoginState>,
    home_state: Option<HomeState>,
    whitelist_state: Option<WhitelistState>,
    materials_state: Option<MaterialsState>,
    material_wizard_state: Option<MaterialWizardState>,
    categories_state: Option<CategoriesState>,
    clients_state: Option<ClientsState>,
    client_wizard_state: Option<ClientWizardState>,
    expenses_state: Option<ExpensesState>,
    expense_wizard_state: Option<ExpenseWizardState>,
    quotes_state: Option<QuotesState>,
    quote_wizard_state: Option<QuoteWizardState>,
    company_wizard_state: Option<CompanyWizardState>,
}

impl AppState {
    fn new(db: db::Database, verifier: AdminWhitelistVerifier, generator: QuoteDocumentGenerator) -> Self {
        Self {
            db,
            verifier,
            generator,
            identity: None,
            screen: AppScreen::Login,
            error_popup: None,
            login_state: None,
            home_state: None,
            whitelist_state: None,
            materials_state: None,
            material_wizard_state: None,
            categories_state: None,
            clients_state: None,
            client_wizard_state: None,
            expenses_state: None,
            expense_wizard_state: None,
            quotes_state: None,
            quote_wizard_state: None,
            company_wizard_state: None,
        }
    }

    /// Email of the logged-in user; every per-user record is scoped by it.
    fn owner_email(&self) -> Result<String> {
        self.identity
            .as_ref()
            .map(|identity| identity.email.clone())
            .ok_or_else(|| anyhow!("no user is logged in"))
    }
}

fn init_logging(config: &Config) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .with_context(|| format!("could not open log file {}", config.log_file.display()))?;

    let filter = EnvFilter::try_from_env("MARCENARIA_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = config::init()?;
    init_logging(&config)?;
    info!(data_dir = %config.data_dir.display(), "starting marcenaria manager");

    // Initialize storage
    let db = db::init(&config).await?;
    let verifier = AdminWhitelistVerifier::from_config(&config);
    let generator = QuoteDocumentGenerator::new(config.output_dir.clone(), config.print_command.clone());

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state
    let mut app_state = AppState::new(db, verifier, generator);

    // Resume a stored session, otherwise ask for credentials
    let stored_session = app_state.db.current_identity().await;
    let result = match stored_session {
        Ok(Some(identity)) => {
            open_home(&mut app_state, identity);
            run_app(&mut terminal, &mut app_state).await
        }
        Ok(None) => {
            open_login(&mut app_state, None);
            run_app(&mut terminal, &mut app_state).await
        }
        Err(err) => Err(err),
    };

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Show any error message
    if let Err(err) = result {
        error!("{err:#}");
        println!("Error: {:#}", err);
        std::process::exit(1);
    }

    println!("Thanks for using Marcenaria Manager!");

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app_state: &mut AppState) -> Result<()> {
    loop {
        // Render current screen
        terminal.draw(|f| {
            match app_state.screen {
                AppScreen::Login => {
                    if let Some(state) = &mut app_state.login_state {
                        render_login(f, state);
                    }
                }
                AppScreen::Home => {
                    if let Some(state) = &mut app_state.home_state {
                        render_home(f, state);
                    }
                }
                AppScreen::Whitelist => {
                    if let Some(state) = &mut app_state.whitelist_state {
                        render_whitelist(f, state);
                    }
                }
                AppScreen::Materials => {
                    if let Some(state) = &mut app_state.materials_state {
                        render_materials(f, state);
                    }
                }
                AppScreen::MaterialWizard => {
                    if let Some(state) = &mut app_state.material_wizard_state {
                        render_material_wizard(f, state);
                    }
                }
                AppScreen::Categories => {
                    if let Some(state) = &mut app_state.categories_state {
                        render_categories(f, state);
                    }
                }
                AppScreen::Clients => {
                    if let Some(state) = &mut app_state.clients_state {
                        render_clients(f, state);
                    }
                }
                AppScreen::ClientWizard => {
                    if let Some(state) = &mut app_state.client_wizard_state {
                        render_client_wizard(f, state);
                    }
                }
                AppScreen::Expenses => {
                    if let Some(state) = &mut app_state.expenses_state {
                        render_expenses(f, state);
                    }
                }
                AppScreen::ExpenseWizard => {
                    if let Some(state) = &mut app_state.expense_wizard_state {
                        render_expense_wizard(f, state);
                    }
                }
                AppScreen::Quotes => {
                    if let Some(state) = &mut app_state.quotes_state {
                        render_quotes(f, state);
                    }
                }
                AppScreen::QuoteWizard => {
                    if let Some(state) = &mut app_state.quote_wizard_state {
                        render_quote_wizard(f, state);
                    }
                }
                AppScreen::CompanyWizard => {
                    if let Some(state) = &mut app_state.company_wizard_state {
                        render_company_wizard(f, state);
                    }
                }
            }

            if let Some(error) = &app_state.error_popup {
                render_error(f, f.size(), error);
            }
        })?;

        // Any key dismisses the popup before the screen sees input again
        if app_state.error_popup.is_some() {
            if let Event::Key(_) = event::read()? {
                app_state.error_popup = None;
            }
            continue;
        }

        // Handle input for current screen
        let outcome = match app_state.screen {
            AppScreen::Login => handle_login_screen(app_state).await,
            AppScreen::Home => handle_home_screen(app_state).await,
            AppScreen::Whitelist => handle_whitelist_screen(app_state).await,
            AppScreen::Materials => handle_materials_screen(app_state).await,
            AppScreen::MaterialWizard => handle_material_wizard_screen(app_state).await,
            AppScreen::Categories => handle_categories_screen(app_state).await,
            AppScreen::Clients => handle_clients_screen(app_state).await,
            AppScreen::ClientWizard => handle_client_wizard_screen(app_state).await,
            AppScreen::Expenses => handle_expenses_screen(app_state).await,
            AppScreen::ExpenseWizard => handle_expense_wizard_screen(app_state).await,
            AppScreen::Quotes => handle_quotes_screen(app_state).await,
            AppScreen::QuoteWizard => handle_quote_wizard_screen(app_state).await,
            AppScreen::CompanyWizard => handle_company_wizard_screen(app_state).await,
        };

        match outcome {
            Ok(true) => break,
            Ok(false) => {}
            Err(err) => {
                error!("{err:#}");
                app_state.error_popup = Some(format!("{err:#}"));
            }
        }
    }

    Ok(())
}

fn open_login(app_state: &mut AppState, error: Option<String>) {
    app_state.identity = None;
    app_state.login_state = Some(match error {
        Some(error) => LoginState::with_error(error),
        None => LoginState::new(),
    });
    app_state.screen = AppScreen::Login;
}

fn open_home(app_state: &mut AppState, identity: Identity) {
    app_state.home_state = Some(HomeState::new(&identity));
    app_state.identity = Some(identity);
    app_state.screen = AppScreen::Home;
}

fn back_home(app_state: &mut AppState) -> Result<()> {
    let identity = app_state
        .identity
        .clone()
        .ok_or_else(|| anyhow!("no user is logged in"))?;
    open_home(app_state, identity);
    Ok(())
}

async fn load_whitelist_screen(app_state: &mut AppState, message: Option<String>) -> Result<()> {
    let emails = app_state.db.load_whitelist().await?;

    let mut state = WhitelistState::new(emails);
    state.message = message;
    app_state.whitelist_state = Some(state);
    app_state.screen = AppScreen::Whitelist;

    Ok(())
}

async fn load_materials_screen(app_state: &mut AppState, message: Option<String>) -> Result<()> {
    let owner = app_state.owner_email()?;
    let materials = app_state.db.load_materials(&owner).await?;

    let mut state = MaterialsState::new(materials);
    state.message = message;
    app_state.materials_state = Some(state);
    app_state.screen = AppScreen::Materials;

    Ok(())
}

async fn load_categories_screen(app_state: &mut AppState) -> Result<()> {
    let owner = app_state.owner_email()?;
    let categories = app_state.db.load_categories(&owner).await?;

    app_state.categories_state = Some(CategoriesState::new(categories));
    app_state.screen = AppScreen::Categories;

    Ok(())
}

async fn load_clients_screen(app_state: &mut AppState, message: Option<String>) -> Result<()> {
    let owner = app_state.owner_email()?;
    let clients = app_state.db.load_clients(&owner).await?;

    let mut state = ClientsState::new(clients);
    state.message = message;
    app_state.clients_state = Some(state);
    app_state.screen = AppScreen::Clients;

    Ok(())
}

async fn load_expenses_screen(app_state: &mut AppState, message: Option<String>) -> Result<()> {
    let owner = app_state.owner_email()?;
    let expenses = app_state.db.load_expenses(&owner).await?;

    let mut state = ExpensesState::new(expenses, today());
    state.message = message;
    app_state.expenses_state = Some(state);
    app_state.screen = AppScreen::Expenses;

    Ok(())
}

async fn load_quotes_screen(app_state: &mut AppState, message: Option<String>) -> Result<()> {
    let owner = app_state.owner_email()?;
    let quotes = app_state.db.load_quotes(&owner).await?;

    app_state.quotes_state = Some(match message {
        Some(message) => QuotesState::with_message(quotes, message),
        None => QuotesState::new(quotes),
    });
    app_state.screen = AppScreen::Quotes;

    Ok(())
}

async fn open_quote_wizard(app_state: &mut AppState, draft: QuoteDraft) -> Result<()> {
    let owner = app_state.owner_email()?;
    let catalog = app_state.db.load_materials(&owner).await?;

    app_state.quote_wizard_state = Some(QuoteWizardState::new(draft, catalog));
    app_state.screen = AppScreen::QuoteWizard;

    Ok(())
}

async fn open_material_wizard(app_state: &mut AppState, existing: Option<Material>) -> Result<()> {
    let owner = app_state.owner_email()?;
    let categories = app_state.db.load_categories(&owner).await?;

    app_state.material_wizard_state = Some(match existing {
        Some(material) => MaterialWizardState::from_existing(material, &categories),
        None => MaterialWizardState::new(&owner, &categories),
    });
    app_state.screen = AppScreen::MaterialWizard;

    Ok(())
}

async fn handle_login_screen(app_state: &mut AppState) -> Result<bool> {
    if let Some(state) = &mut app_state.login_state {
        match handle_login_input(state)? {
            Some(LoginAction::Exit) => {
                return Ok(true);
            }
            Some(LoginAction::Submit { email, password }) => {
                let outcome = app_state.db.login(&app_state.verifier, &email, &password).await;
                match outcome {
                    Ok(identity) => open_home(app_state, identity),
                    Err(AuthError::Storage(err)) => {
                        error!("{err:#}");
                        state.show_error = Some(format!("{err:#}"));
                    }
                    Err(err) => state.show_error = Some(err.to_string()),
                }
            }
            None => {}
        }
    }

    Ok(false)
}

async fn handle_home_screen(app_state: &mut AppState) -> Result<bool> {
    if let Some(state) = &mut app_state.home_state {
        match handle_home_input(state)? {
            Some(HomeAction::Exit) => {
                return Ok(true);
            }
            Some(HomeAction::Logout) => {
                app_state.db.logout().await?;
                open_login(app_state, None);
            }
            Some(HomeAction::Open(entry)) => match entry {
                MenuEntry::NewQuote => open_quote_wizard(app_state, QuoteDraft::new()).await?,
                MenuEntry::Quotes => load_quotes_screen(app_state, None).await?,
                MenuEntry::Materials => load_materials_screen(app_state, None).await?,
                MenuEntry::Categories => load_categories_screen(app_state).await?,
                MenuEntry::Expenses => load_expenses_screen(app_state, None).await?,
                MenuEntry::Clients => load_clients_screen(app_state, None).await?,
                MenuEntry::CompanyProfile => {
                    let profile = app_state.db.load_company_profile().await?;
                    app_state.company_wizard_state = Some(CompanyWizardState::new(profile));
                    app_state.screen = AppScreen::CompanyWizard;
                }
                MenuEntry::Whitelist => load_whitelist_screen(app_state, None).await?,
            },
            None => {}
        }
    }

    Ok(false)
}

async fn handle_whitelist_screen(app_state: &mut AppState) -> Result<bool> {
    let Some(identity) = app_state.identity.clone() else {
        open_login(app_state, Some("Your session has ended. Please log in again.".to_string()));
        return Ok(false);
    };

    if let Some(state) = &mut app_state.whitelist_state {
        match handle_whitelist_input(state)? {
            Some(WhitelistAction::Back) => back_home(app_state)?,
            Some(WhitelistAction::Add(email)) => {
                let outcome = app_state.db.add_to_whitelist(&identity, &email).await;
                match outcome {
                    Ok(WhitelistChange::Added) => {
                        load_whitelist_screen(app_state, Some(format!("{} authorized.", email.trim()))).await?;
                    }
                    Ok(WhitelistChange::AlreadyListed) => {
                        state.show_error = Some("This email is already authorized.".to_string());
                    }
                    Err(AuthError::Storage(err)) => {
                        error!("{err:#}");
                        state.show_error = Some(format!("{err:#}"));
                    }
                    Err(err) => state.show_error = Some(err.to_string()),
                }
            }
            Some(WhitelistAction::Remove(email)) => {
                let outcome = app_state.db.remove_from_whitelist(&identity, &email).await;
                match outcome {
                    Ok(()) => load_whitelist_screen(app_state, Some(format!("{} removed.", email))).await?,
                    Err(AuthError::Storage(err)) => {
                        error!("{err:#}");
                        state.show_error = Some(format!("{err:#}"));
                    }
                    Err(err) => state.show_error = Some(err.to_string()),
                }
            }
            None => {}
        }
    }

    Ok(false)
}

async fn handle_materials_screen(app_state: &mut AppState) -> Result<bool> {
    if let Some(state) = &mut app_state.materials_state {
        match handle_materials_input(state)? {
            Some(MaterialAction::Back) => back_home(app_state)?,
            Some(MaterialAction::NewMaterial) => open_material_wizard(app_state, None).await?,
            Some(MaterialAction::EditMaterial(material)) => open_material_wizard(app_state, Some(material)).await?,
            Some(MaterialAction::DeleteMaterial(id)) => {
                let owner = app_state.owner_email()?;
                app_state.db.delete_material(&owner, &id).await?;
                load_materials_screen(app_state, Some("Material deleted.".to_string())).await?;
            }
            None => {}
        }
    }

    Ok(false)
}

async fn handle_material_wizard_screen(app_state: &mut AppState) -> Result<bool> {
    if let Some(state) = &mut app_state.material_wizard_state {
        match handle_material_wizard_input(state)? {
            Some(MaterialWizardAction::Cancel) => load_materials_screen(app_state, None).await?,
            Some(MaterialWizardAction::Save(material)) => {
                let message = if state.is_new() {
                    app_state.db.create_material(material).await?;
                    "Material saved."
                } else if app_state.db.update_material(&material).await?.is_some() {
                    "Material saved."
                } else {
                    "Material not found."
                };
                load_materials_screen(app_state, Some(message.to_string())).await?;
            }
            None => {}
        }
    }

    Ok(false)
}

async fn handle_categories_screen(app_state: &mut AppState) -> Result<bool> {
    if let Some(state) = &mut app_state.categories_state {
        match handle_categories_input(state)? {
            Some(CategoryAction::Back) => back_home(app_state)?,
            Some(CategoryAction::AddCategory(name)) => {
                let owner = app_state.owner_email()?;
                app_state.db.create_category(&owner, &name).await?;
                load_categories_screen(app_state).await?;
            }
            Some(CategoryAction::DeleteCategory(id)) => {
                let owner = app_state.owner_email()?;
                app_state.db.delete_category(&owner, &id).await?;
                load_categories_screen(app_state).await?;
            }
            None => {}
        }
    }

    Ok(false)
}

async fn handle_clients_screen(app_state: &mut AppState) -> Result<bool> {
    if let Some(state) = &mut app_state.clients_state {
        match handle_clients_input(state)? {
            Some(ClientAction::Back) => back_home(app_state)?,
            Some(ClientAction::NewClient) => {
                let owner = app_state.owner_email()?;
                app_state.client_wizard_state = Some(ClientWizardState::new(&owner));
                app_state.screen = AppScreen::ClientWizard;
            }
            Some(ClientAction::EditClient(client)) => {
                app_state.client_wizard_state = Some(ClientWizardState::from_existing(client));
                app_state.screen = AppScreen::ClientWizard;
            }
            Some(ClientAction::DeleteClient(id)) => {
                let owner = app_state.owner_email()?;
                app_state.db.delete_client(&owner, &id).await?;
                load_clients_screen(app_state, Some("Client deleted.".to_string())).await?;
            }
            None => {}
        }
    }

    Ok(false)
}

async fn handle_client_wizard_screen(app_state: &mut AppState) -> Result<bool> {
    if let Some(state) = &mut app_state.client_wizard_state {
        match handle_client_wizard_input(state)? {
            Some(ClientWizardAction::Cancel) => load_clients_screen(app_state, None).await?,
            Some(ClientWizardAction::Save(client)) => {
                let message = if state.is_new() {
                    app_state.db.create_client(client).await?;
                    "Client saved."
                } else if app_state.db.update_client(&client).await?.is_some() {
                    "Client saved."
                } else {
                    "Client not found."
                };
                load_clients_screen(app_state, Some(message.to_string())).await?;
            }
            None => {}
        }
    }

    Ok(false)
}

async fn handle_expenses_screen(app_state: &mut AppState) -> Result<bool> {
    if let Some(state) = &mut app_state.expenses_state {
        match handle_expenses_input(state)? {
            Some(ExpenseAction::Back) => back_home(app_state)?,
            Some(ExpenseAction::NewExpense) => {
                let owner = app_state.owner_email()?;
                app_state.expense_wizard_state = Some(ExpenseWizardState::new(&owner, today()));
                app_state.screen = AppScreen::ExpenseWizard;
            }
            Some(ExpenseAction::DeleteExpense(id)) => {
                let owner = app_state.owner_email()?;
                app_state.db.delete_expense(&owner, &id).await?;
                load_expenses_screen(app_state, Some("Expense deleted.".to_string())).await?;
            }
            None => {}
        }
    }

    Ok(false)
}

async fn handle_expense_wizard_screen(app_state: &mut AppState) -> Result<bool> {
    if let Some(state) = &mut app_state.expense_wizard_state {
        match handle_expense_wizard_input(state)? {
            Some(ExpenseWizardAction::Cancel) => load_expenses_screen(app_state, None).await?,
            Some(ExpenseWizardAction::Save(expense)) => {
                app_state.db.create_expense(expense).await?;
                load_expenses_screen(app_state, Some("Expense saved.".to_string())).await?;
            }
            None => {}
        }
    }

    Ok(false)
}

async fn handle_quotes_screen(app_state: &mut AppState) -> Result<bool> {
    let owner = app_state.owner_email()?;

    if let Some(state) = &mut app_state.quotes_state {
        match handle_quotes_input(state)? {
            Some(QuoteAction::Back) => back_home(app_state)?,
            Some(QuoteAction::NewQuote) => open_quote_wizard(app_state, QuoteDraft::new()).await?,
            Some(QuoteAction::EditQuote(id)) => {
                let stored = app_state.db.get_quote(&owner, &id).await?;
                match stored {
                    Some(quote) => open_quote_wizard(app_state, QuoteDraft::from_quote(&quote)).await?,
                    None => load_quotes_screen(app_state, Some(QuoteError::NotFound(id).to_string())).await?,
                }
            }
            Some(QuoteAction::DeleteQuote(id)) => {
                app_state.db.delete_quote(&owner, &id).await?;
                load_quotes_screen(app_state, Some("Quote deleted.".to_string())).await?;
            }
            Some(QuoteAction::PrintQuote(id)) => {
                let stored = app_state.db.get_quote(&owner, &id).await?;
                match stored {
                    Some(quote) => {
                        let profile = app_state.db.load_company_profile().await?;
                        state.document_written(app_state.generator.generate(&quote, &profile));
                    }
                    None => load_quotes_screen(app_state, Some(QuoteError::NotFound(id).to_string())).await?,
                }
            }
            None => {}
        }
    }

    Ok(false)
}

async fn handle_quote_wizard_screen(app_state: &mut AppState) -> Result<bool> {
    let owner = app_state.owner_email()?;

    if let Some(state) = &mut app_state.quote_wizard_state {
        match handle_quote_wizard_input(state)? {
            Some(QuoteWizardAction::Cancel) => load_quotes_screen(app_state, None).await?,
            Some(QuoteWizardAction::Save(draft)) => {
                let saved = app_state.db.save_quote(&owner, &draft, today()).await;
                match saved {
                    Ok(_) => load_quotes_screen(app_state, Some("Quote saved.".to_string())).await?,
                    Err(QuoteError::Validation(err)) => state.show_error = Some(err.to_string()),
                    Err(err @ QuoteError::NotFound(_)) => {
                        load_quotes_screen(app_state, Some(err.to_string())).await?;
                    }
                    Err(QuoteError::Storage(err)) => {
                        error!("{err:#}");
                        state.show_error = Some(format!("{err:#}"));
                    }
                }
            }
            Some(QuoteWizardAction::Print(draft)) => {
                // An unsaved draft is printed under a placeholder id.
                let id = draft.id.clone().unwrap_or_else(|| "rascunho".to_string());
                let quote = draft.to_quote(id, today(), &owner);
                let profile = app_state.db.load_company_profile().await?;
                state.document_written(app_state.generator.generate(&quote, &profile));
            }
            None => {}
        }
    }

    Ok(false)
}

async fn handle_company_wizard_screen(app_state: &mut AppState) -> Result<bool> {
    if let Some(state) = &mut app_state.company_wizard_state {
        match handle_company_wizard_input(state)? {
            Some(CompanyWizardAction::Cancel) => back_home(app_state)?,
            Some(CompanyWizardAction::Save(profile)) => {
                app_state.db.save_company_profile(&profile).await?;
                back_home(app_state)?;
            }
            None => {}
        }
    }

    Ok(false)
}
