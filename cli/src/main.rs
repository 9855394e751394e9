//! Scholarboard CLI: command-line interface for the research dashboard
//!
//! Talks to a running `scholarboard` server over its JSON API.

mod client;

use clap::{Parser, Subcommand};
use client::ApiClient;
use comfy_table::{ContentArrangement, Table};
use serde_json::{json, Value};

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "scholarboard", version, about = "Scholarboard research dashboard CLI")]
struct Cli {
    /// Server HTTP URL
    #[arg(long, default_value = "http://localhost:8050", global = true, env = "SCHOLARBOARD_URL")]
    url: String,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OptionList {
    Universities,
    UniversityCount,
    Interests,
    Faculty,
    DocumentFaculty,
    Keywords,
    Titles,
}

impl OptionList {
    fn path(&self) -> &'static str {
        match self {
            OptionList::Universities => "/api/options/universities",
            OptionList::UniversityCount => "/api/options/university-count",
            OptionList::Interests => "/api/options/interests",
            OptionList::Faculty => "/api/options/faculty",
            OptionList::DocumentFaculty => "/api/options/document-faculty",
            OptionList::Keywords => "/api/options/keywords",
            OptionList::Titles => "/api/options/titles",
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Get server status
    Status,
    /// Top universities by publications and by citations
    Rankings {
        /// First rank, counted from 1
        #[arg(long, default_value_t = 1)]
        start: u32,
        /// Last rank, inclusive
        #[arg(long, default_value_t = 10)]
        end: u32,
        /// Show the last periodic refresh instead of querying
        #[arg(long)]
        latest: bool,
    },
    /// Top research areas of a university
    ResearchAreas { university: String },
    /// Top universities and faculty for a research interest
    Interest { keyword: String },
    /// Contact details of a faculty member
    Contact { name: String },
    /// Keywords of a faculty member's publications
    FacultyInterests { name: String },
    /// Set a faculty member's email
    UpdateEmail { name: String, value: String },
    /// Set a faculty member's phone number
    UpdatePhone { name: String, value: String },
    /// Most cited publications for a keyword
    Publications { keyword: String },
    /// List selector options
    Options {
        #[arg(value_enum)]
        list: OptionList,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let client = ApiClient::new(&cli.url);

    let result = match cli.command {
        Commands::Status => run_status(&client, &cli.format).await,
        Commands::Rankings { start, end, latest } => {
            run_rankings(&client, start, end, latest, &cli.format).await
        }
        Commands::ResearchAreas { university } => {
            run_research_areas(&client, &university, &cli.format).await
        }
        Commands::Interest { keyword } => run_interest(&client, &keyword, &cli.format).await,
        Commands::Contact { name } => run_contact(&client, &name, &cli.format).await,
        Commands::FacultyInterests { name } => {
            run_faculty_interests(&client, &name, &cli.format).await
        }
        Commands::UpdateEmail { name, value } => {
            run_update(&client, "/api/faculty/email", &name, &value, &cli.format).await
        }
        Commands::UpdatePhone { name, value } => {
            run_update(&client, "/api/faculty/phone", &name, &value, &cli.format).await
        }
        Commands::Publications { keyword } => {
            run_publications(&client, &keyword, &cli.format).await
        }
        Commands::Options { list } => run_options(&client, list, &cli.format).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Columns and rows ready for table or CSV output
#[derive(Debug, Default, PartialEq)]
struct Rows {
    columns: Vec<String>,
    records: Vec<Vec<Value>>,
}

impl Rows {
    /// Pick `fields` out of each object, headed by `headers`
    fn from_objects(headers: &[&str], fields: &[&str], items: &Value) -> Self {
        let records = items
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .map(|item| fields.iter().map(|f| item[*f].clone()).collect())
                    .collect()
            })
            .unwrap_or_default();
        Self {
            columns: headers.iter().map(|h| h.to_string()).collect(),
            records,
        }
    }

    /// One row per chart datum
    fn from_chart(chart: &Value, label_header: &str, value_header: &str) -> Self {
        Self::from_objects(&[label_header, value_header], &["label", "value"], &chart["bars"])
    }

    /// Single-column rows from a string list
    fn from_strings(header: &str, items: &Value) -> Self {
        let records = items
            .as_array()
            .map(|items| items.iter().map(|v| vec![v.clone()]).collect())
            .unwrap_or_default();
        Self {
            columns: vec![header.to_string()],
            records,
        }
    }
}

fn print_rows(rows: &Rows, format: &OutputFormat) {
    match format {
        OutputFormat::Csv => {
            println!("{}", rows.columns.join(","));
            for row in &rows.records {
                let cells: Vec<String> = row.iter().map(format_csv_value).collect();
                println!("{}", cells.join(","));
            }
        }
        _ => {
            if rows.records.is_empty() {
                println!("(no results)");
                return;
            }
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(&rows.columns);
            for row in &rows.records {
                let cells: Vec<String> = row.iter().map(format_table_value).collect();
                table.add_row(cells);
            }
            println!("{}", table);
            println!("{} row(s)", rows.records.len());
        }
    }
}

fn print_json(value: &Value) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run_status(client: &ApiClient, format: &OutputFormat) -> CliResult {
    let status = client.get("/api/status", &[]).await?;

    match format {
        OutputFormat::Json => print_json(&status)?,
        _ => {
            println!("Status:  {}", format_table_value(&status["status"]));
            println!("Version: {}", format_table_value(&status["version"]));
            match status.get("refresh").filter(|r| !r.is_null()) {
                Some(refresh) => {
                    println!("Refresh range: {}", range_label(&refresh["range"]));
                    println!("Last refresh:  {}", format_table_value(&refresh["refreshed_at"]));
                }
                None => println!("Refresh: disabled"),
            }
        }
    }

    Ok(())
}

fn range_label(range: &Value) -> String {
    format!(
        "[{}, {}]",
        format_table_value(&range["start"]),
        format_table_value(&range["end"])
    )
}

async fn run_rankings(
    client: &ApiClient,
    start: u32,
    end: u32,
    latest: bool,
    format: &OutputFormat,
) -> CliResult {
    let response = if latest {
        client.get("/api/rankings/latest", &[]).await?
    } else {
        client
            .get(
                "/api/rankings",
                &[("start", start.to_string()), ("end", end.to_string())],
            )
            .await?
    };

    if let OutputFormat::Json = format {
        return print_json(&response);
    }

    for key in ["publications", "citations"] {
        let chart = &response["charts"][key];
        if let OutputFormat::Table = format {
            println!(
                "{} {}",
                format_table_value(&chart["title"]),
                range_label(&response["range"])
            );
        }
        let rows = Rows::from_chart(
            chart,
            chart["label_axis"].as_str().unwrap_or("University"),
            chart["value_axis"].as_str().unwrap_or("Total"),
        );
        print_rows(&rows, format);
    }

    Ok(())
}

async fn run_research_areas(
    client: &ApiClient,
    university: &str,
    format: &OutputFormat,
) -> CliResult {
    let pie = client
        .get("/api/research-areas", &[("university", university.to_string())])
        .await?;

    if let OutputFormat::Json = format {
        return print_json(&pie);
    }

    let total: i64 = pie["slices"]
        .as_array()
        .map(|s| s.iter().filter_map(|d| d["value"].as_i64()).sum())
        .unwrap_or(0);
    let mut rows = Rows::from_objects(
        &["Research Area", "Publications"],
        &["label", "value"],
        &pie["slices"],
    );
    rows.columns.push("Share".to_string());
    for row in rows.records.iter_mut() {
        let value = row[1].as_i64().unwrap_or(0);
        let share = if total > 0 {
            format!("{:.1}%", value as f64 * 100.0 / total as f64)
        } else {
            String::new()
        };
        row.push(Value::String(share));
    }

    if let OutputFormat::Table = format {
        println!("{}", format_table_value(&pie["title"]));
    }
    print_rows(&rows, format);
    Ok(())
}

async fn run_interest(client: &ApiClient, keyword: &str, format: &OutputFormat) -> CliResult {
    let tables = client
        .get(
            "/api/interest",
            &[("keyword", keyword.to_string()), ("n_clicks", "1".to_string())],
        )
        .await?;

    if let OutputFormat::Json = format {
        return print_json(&tables);
    }

    print_rows(
        &Rows::from_objects(
            &["University", "Faculty", "Publications"],
            &["name", "num_faculty", "num_publications"],
            &tables["universities"],
        ),
        format,
    );
    print_rows(
        &Rows::from_objects(
            &["Faculty", "Publications", "Citations"],
            &["name", "num_publications", "num_citations"],
            &tables["faculty"],
        ),
        format,
    );
    Ok(())
}

/// Text lines of a contact panel, with absent fields shown as N/A
fn contact_lines(view: &Value) -> Vec<String> {
    match view["state"].as_str() {
        Some("found") => {
            let contact = &view["contact"];
            let field = |key: &str| {
                contact[key]
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| "N/A".to_string())
            };
            vec![
                format!("Name: {}", field("name")),
                format!("Email: {}", field("email")),
                format!("Phone: {}", field("phone")),
                format!("Institute: {}", field("institute")),
            ]
        }
        Some("not_found") => vec![view["message"].as_str().unwrap_or_default().to_string()],
        _ => Vec::new(),
    }
}

async fn run_contact(client: &ApiClient, name: &str, format: &OutputFormat) -> CliResult {
    let view = client
        .get(
            "/api/faculty/contact",
            &[("name", name.to_string()), ("n_clicks", "1".to_string())],
        )
        .await?;

    match format {
        OutputFormat::Json => print_json(&view)?,
        _ => {
            for line in contact_lines(&view) {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

async fn run_faculty_interests(client: &ApiClient, name: &str, format: &OutputFormat) -> CliResult {
    let response = client
        .get("/api/faculty/interests", &[("name", name.to_string())])
        .await?;

    match format {
        OutputFormat::Json => print_json(&response),
        _ => {
            print_rows(&Rows::from_strings("Interest", &response["interests"]), format);
            Ok(())
        }
    }
}

async fn run_update(
    client: &ApiClient,
    path: &str,
    name: &str,
    value: &str,
    format: &OutputFormat,
) -> CliResult {
    let body = json!({ "name": name, "value": value, "n_clicks": 1 });
    let status = client.post(path, &body).await?;

    match format {
        OutputFormat::Json => print_json(&status)?,
        _ => {
            if let Some(message) = status["message"].as_str() {
                println!("{}", message);
            }
        }
    }
    Ok(())
}

async fn run_publications(client: &ApiClient, keyword: &str, format: &OutputFormat) -> CliResult {
    let view = client
        .get(
            "/api/publications",
            &[("keyword", keyword.to_string()), ("n_clicks", "1".to_string())],
        )
        .await?;

    match (format, view["state"].as_str()) {
        (OutputFormat::Json, _) => print_json(&view)?,
        (_, Some("found")) => print_rows(
            &Rows::from_objects(&["Title", "Citations"], &["title", "numCitations"], &view["rows"]),
            format,
        ),
        (_, Some("none_found")) => println!("{}", view["message"].as_str().unwrap_or_default()),
        _ => {}
    }
    Ok(())
}

async fn run_options(client: &ApiClient, list: OptionList, format: &OutputFormat) -> CliResult {
    let response = client.get(list.path(), &[]).await?;

    match (format, list) {
        (OutputFormat::Json, _) => print_json(&response)?,
        (_, OptionList::UniversityCount) => println!("{}", format_table_value(&response["count"])),
        _ => print_rows(&Rows::from_strings("Name", &response), format),
    }
    Ok(())
}

fn format_table_value(v: &Value) -> String {
    match v {
        Value::Null => "null".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Object(_) | Value::Array(_) => serde_json::to_string(v).unwrap_or_default(),
    }
}

fn format_csv_value(v: &Value) -> String {
    match v {
        Value::Null => "".to_string(),
        Value::String(s) => {
            if s.contains(',') || s.contains('"') || s.contains('\n') {
                format!("\"{}\"", s.replace('"', "\"\""))
            } else {
                s.clone()
            }
        }
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => {
            let json = serde_json::to_string(v).unwrap_or_default();
            format!("\"{}\"", json.replace('"', "\"\""))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_from_chart() {
        let chart = json!({
            "title": "Top Universities by Publications",
            "bars": [{"label": "MIT", "value": 40}, {"label": "CMU", "value": 25}]
        });
        let rows = Rows::from_chart(&chart, "University", "Total Publications");
        assert_eq!(rows.columns, vec!["University", "Total Publications"]);
        assert_eq!(rows.records[1], vec![json!("CMU"), json!(25)]);
    }

    #[test]
    fn test_rows_from_missing_list_is_empty() {
        assert_eq!(Rows::from_strings("Name", &Value::Null).records.len(), 0);
    }

    #[test]
    fn test_contact_lines_show_na() {
        let view = json!({
            "state": "found",
            "contact": {"name": "Ada", "email": null, "phone": "555", "institute": "CSAIL"}
        });
        assert_eq!(
            contact_lines(&view),
            vec!["Name: Ada", "Email: N/A", "Phone: 555", "Institute: CSAIL"]
        );
        assert!(contact_lines(&json!({"state": "hidden"})).is_empty());
    }

    #[test]
    fn test_csv_quoting() {
        assert_eq!(format_csv_value(&json!("Smith, J.")), "\"Smith, J.\"");
        assert_eq!(format_csv_value(&Value::Null), "");
        assert_eq!(format_csv_value(&json!(7)), "7");
    }
}
