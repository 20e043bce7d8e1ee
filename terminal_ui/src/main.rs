use std::env;
use std::io;

use todolist_client::TodoListClient;
use todolist_shared::TaskInfo;
use tui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph},
    Terminal,
};

async fn fetch_tasks() -> anyhow::Result<Vec<TaskInfo>> {
    let api_url = env::var("API_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
    let client = TodoListClient::new(reqwest::Client::new(), api_url);
    Ok(client.tasks().await?)
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let tasks = tokio::runtime::Runtime::new()?.block_on(fetch_tasks())?;

    let stdout = io::stdout();
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    terminal.clear()?;

    let task_list = tasks
        .iter()
        .map(|task| {
            let marker = match task.is_complete {
                Some(true) => "[x] ",
                _ => "[ ] ",
            };
            Spans::from(vec![
                Span::raw(marker),
                Span::styled(
                    task.title.clone().unwrap_or_else(|| "(untitled)".to_string()),
                    Style::default().fg(Color::Yellow),
                ),
                Span::raw(" due "),
                Span::styled(task.due_date.clone(), Style::default().fg(Color::LightBlue)),
                Span::raw(format!(" ({}h)", task.estimated_time)),
            ])
        })
        .collect::<Vec<_>>();

    let task_paragraph = Paragraph::new(task_list)
        .block(Block::default().borders(Borders::ALL).title("todolist"))
        .alignment(Alignment::Left);

    terminal.draw(|f| {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([Constraint::Percentage(100)].as_ref())
            .split(f.size());

        f.render_widget(task_paragraph, chunks[0]);
    })?;

    Ok(())
}
