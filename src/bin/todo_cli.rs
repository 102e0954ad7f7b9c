use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use todo_backend::client::{
    CreateTodoForm, DeleteButton, HttpTodoApi, ListView, QueryCache, TodoActions, TodoApi,
    TodosQuery, ToggleButton,
};
use todo_backend::config;

const USAGE: &str = "usage: todo-cli <list | add <title> [description] | toggle <id> | delete <id>>";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config::cli_log_filter_from_env()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    let api: Arc<dyn TodoApi> = Arc::new(HttpTodoApi::new(config::api_url_from_env())?);
    let cache = QueryCache::new();
    let query = TodosQuery::new(api.clone(), cache.clone());
    let actions = TodoActions::new(api, cache);

    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["list"] | [] => {}
        ["add", title, rest @ ..] => {
            let mut form = CreateTodoForm::default();
            form.set_title(*title);
            form.set_description(rest.join(" "));
            if let Some(todo) = form.submit(&actions).await {
                println!("Created #{}", todo.id);
            }
        }
        ["toggle", id] => {
            let id: i64 = id.parse()?;
            // Toggle needs the current record to overwrite it.
            query.refetch().await?;
            match query.data().unwrap_or_default().into_iter().find(|t| t.id == id) {
                Some(todo) => {
                    let button = ToggleButton::new(todo);
                    println!("{}", button.label());
                    button.click(&actions).await;
                }
                None => println!("No todo #{}", id),
            }
        }
        ["delete", id] => {
            DeleteButton::new(id.parse()?).click(&actions).await;
        }
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    }

    if let Err(e) = query.refetch().await {
        eprintln!("could not load todos: {}", e);
    }
    print!("{}", ListView::render(&query.state()));

    Ok(())
}
