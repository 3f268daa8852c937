use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use training_insights::export::{CsvExport, ExportSink};
use training_insights::filter::FilterOptions;
use training_insights::loader;
use training_insights::models::{CourseType, TrainingRecord};
use training_insights::report;
use training_insights::table::{DEFAULT_ROWS_PER_PAGE, LEADERBOARD_ROWS_PER_PAGE};
use training_insights::{
    ComparisonField, Dashboard, DashboardSnapshot, Filters, SortDirection, TableRow, TableView,
    Thresholds, TimePeriod,
};

#[derive(Parser)]
#[command(name = "training-insights")]
#[command(about = "Training completion analytics over a spreadsheet export", long_about = None)]
struct Cli {
    /// CSV export of training records
    #[arg(long)]
    csv: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(flatten)]
    filters: FilterArgs,

    #[command(flatten)]
    thresholds: ThresholdArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct FilterArgs {
    #[arg(long = "branch", global = true)]
    branches: Vec<String>,
    #[arg(long = "district-head", global = true)]
    district_heads: Vec<String>,
    #[arg(long = "supervisor", global = true)]
    supervisors: Vec<String>,
    #[arg(long = "course", global = true)]
    courses: Vec<String>,
    #[arg(long = "course-type", global = true)]
    course_types: Vec<String>,
    /// Earliest completion date (YYYY-MM-DD)
    #[arg(long, global = true)]
    from: Option<NaiveDate>,
    /// Latest completion date (YYYY-MM-DD)
    #[arg(long, global = true)]
    to: Option<NaiveDate>,
}

impl FilterArgs {
    fn to_filters(&self) -> Filters {
        Filters {
            branches: self.branches.iter().cloned().collect(),
            district_heads: self.district_heads.iter().cloned().collect(),
            supervisors: self.supervisors.iter().cloned().collect(),
            courses: self.courses.iter().cloned().collect(),
            course_types: self
                .course_types
                .iter()
                .map(|value| CourseType::parse_lenient(value))
                .collect(),
            time_period: TimePeriod {
                start: self.from,
                end: self.to,
            },
        }
    }
}

#[derive(Args)]
struct ThresholdArgs {
    /// JSON file with threshold overrides
    #[arg(long, global = true)]
    thresholds: Option<PathBuf>,
    #[arg(long, global = true)]
    at_risk_completion: Option<f64>,
    #[arg(long, global = true)]
    at_risk_score: Option<f64>,
    #[arg(long, global = true)]
    attention_completion: Option<f64>,
    #[arg(long, global = true)]
    attention_score: Option<f64>,
}

impl ThresholdArgs {
    fn resolve(&self) -> anyhow::Result<Thresholds> {
        let mut thresholds = match &self.thresholds {
            Some(path) => Thresholds::load(path)
                .with_context(|| format!("failed to load thresholds from {}", path.display()))?,
            None => Thresholds::default(),
        };
        if let Some(value) = self.at_risk_completion {
            thresholds.at_risk_completion = value;
        }
        if let Some(value) = self.at_risk_score {
            thresholds.at_risk_score = value;
        }
        if let Some(value) = self.attention_completion {
            thresholds.course_attention_completion = value;
        }
        if let Some(value) = self.attention_score {
            thresholds.course_attention_score = value;
        }
        thresholds.validate()?;
        Ok(thresholds)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print overview KPIs
    Summary {
        #[arg(long)]
        json: bool,
    },
    /// List the values available for each filter
    Options {
        #[arg(long)]
        json: bool,
    },
    /// Top trainees, branches and supervisors
    Leaderboard {
        #[arg(long, default_value_t = LEADERBOARD_ROWS_PER_PAGE)]
        limit: usize,
        #[arg(long)]
        json: bool,
    },
    /// Trainees below the at-risk thresholds
    AtRisk {
        #[arg(long)]
        json: bool,
    },
    /// Courses needing attention and top performing courses
    Courses {
        #[arg(long)]
        json: bool,
    },
    /// Monthly completion trend
    Trends {
        #[arg(long)]
        json: bool,
    },
    /// Training hours against post-assessment score per trainee
    Engagement {
        #[arg(long)]
        json: bool,
    },
    /// Compare two branches, district heads or supervisors
    Compare {
        #[arg(long)]
        field: ComparisonField,
        #[arg(long)]
        left: String,
        #[arg(long)]
        right: String,
        #[arg(long)]
        json: bool,
    },
    /// Page through any report with search and sort
    Table {
        #[arg(value_enum)]
        view: View,
        #[arg(long)]
        search: Option<String>,
        /// Column key to sort by
        #[arg(long)]
        sort: Option<String>,
        #[arg(long)]
        descending: bool,
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Rows per page, 5 for leaderboards and 10 elsewhere by default
        #[arg(long)]
        per_page: Option<usize>,
    },
    /// Export a report as CSV
    Export {
        #[arg(value_enum)]
        view: View,
        #[arg(long, default_value = ".")]
        dir: PathBuf,
        /// File name, defaults to the view name
        #[arg(long)]
        name: Option<String>,
    },
    /// Generate a markdown report
    Report {
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum View {
    Records,
    TopTrainees,
    TopBranches,
    TopSupervisors,
    TopImprovers,
    TopCourses,
    AtRisk,
    CoursesNeedingAttention,
    CourseAnalysis,
    BranchComparison,
    CourseTypes,
    Trends,
    Engagement,
}

impl View {
    fn name(&self) -> &'static str {
        match self {
            View::Records => "records",
            View::TopTrainees => "top-trainees",
            View::TopBranches => "top-branches",
            View::TopSupervisors => "top-supervisors",
            View::TopImprovers => "top-improvers",
            View::TopCourses => "top-courses",
            View::AtRisk => "at-risk",
            View::CoursesNeedingAttention => "courses-needing-attention",
            View::CourseAnalysis => "course-analysis",
            View::BranchComparison => "branch-comparison",
            View::CourseTypes => "course-types",
            View::Trends => "trends",
            View::Engagement => "engagement",
        }
    }

    fn default_page_size(&self) -> usize {
        match self {
            View::TopTrainees | View::TopBranches | View::TopSupervisors => {
                LEADERBOARD_ROWS_PER_PAGE
            }
            _ => DEFAULT_ROWS_PER_PAGE,
        }
    }
}

/// Runs a generic action over whichever row type a view produces.
trait ViewVisitor {
    fn visit<R: TableRow + Clone>(self, view: View, rows: &[R]) -> anyhow::Result<()>;
}

fn visit_view<V: ViewVisitor>(
    view: View,
    records: &[TrainingRecord],
    snapshot: &DashboardSnapshot,
    visitor: V,
) -> anyhow::Result<()> {
    match view {
        View::Records => visitor.visit(view, records),
        View::TopTrainees => visitor.visit(view, &snapshot.leaderboard.trainees),
        View::TopBranches => visitor.visit(view, &snapshot.leaderboard.branches),
        View::TopSupervisors => visitor.visit(view, &snapshot.leaderboard.supervisors),
        View::TopImprovers => visitor.visit(view, &snapshot.insights.improvers),
        View::TopCourses => visitor.visit(view, &snapshot.top_courses),
        View::AtRisk => visitor.visit(view, &snapshot.insights.at_risk),
        View::CoursesNeedingAttention => visitor.visit(view, &snapshot.insights.courses),
        View::CourseAnalysis => visitor.visit(view, &snapshot.course_analysis),
        View::BranchComparison => visitor.visit(view, &snapshot.branch_comparison),
        View::CourseTypes => visitor.visit(view, &snapshot.course_types),
        View::Trends => visitor.visit(view, &snapshot.trends),
        View::Engagement => visitor.visit(view, &snapshot.engagement.points),
    }
}

struct PrintTable {
    search: Option<String>,
    sort: Option<String>,
    descending: bool,
    page: usize,
    per_page: usize,
}

impl ViewVisitor for PrintTable {
    fn visit<R: TableRow + Clone>(self, view: View, rows: &[R]) -> anyhow::Result<()> {
        let mut table = TableView::with_rows_per_page(rows.to_vec(), self.per_page)?;
        if let Some(term) = &self.search {
            table.set_search(term);
        }
        if let Some(key) = &self.sort {
            let direction = if self.descending {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            };
            table = table.with_sort(key, direction)?;
        }
        table.set_page(self.page);

        println!(
            "{}: page {} of {} ({} rows)",
            view.name(),
            table.current_page(),
            table.page_count(),
            table.total_items()
        );
        print!("{}", report::markdown_table(table.paginated_items(), usize::MAX));
        Ok(())
    }
}

struct ExportView {
    sink: CsvExport,
    name: Option<String>,
}

impl ViewVisitor for ExportView {
    fn visit<R: TableRow + Clone>(mut self, view: View, rows: &[R]) -> anyhow::Result<()> {
        let name = self.name.unwrap_or_else(|| view.name().to_string());
        self.sink
            .export(&name, rows)
            .with_context(|| format!("failed to export {} to {}", name, self.sink.dir().display()))?;
        println!("Exported {} rows to {}.", rows.len(), self.sink.path_for(&name).display());
        Ok(())
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn init_logging(verbose: u8) -> anyhow::Result<()> {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let store = loader::load_store(&cli.csv)
        .with_context(|| format!("failed to load records from {}", cli.csv.display()))?;
    let thresholds = cli.thresholds.resolve()?;
    let dashboard = Dashboard::new(store)
        .with_filters(cli.filters.to_filters())
        .with_thresholds(thresholds);
    info!(records = dashboard.store().len(), "dashboard ready");

    match cli.command {
        Commands::Summary { json } => {
            let overview = dashboard.snapshot().overview;
            if json {
                return print_json(&overview);
            }
            println!("Records:          {}", overview.records);
            println!("Trainees:         {}", overview.trainees);
            println!("Learners (email): {}", overview.learners);
            println!("Courses:          {}", overview.courses);
            println!("Avg completion:   {:.1}%", overview.avg_completion);
            println!("Avg post score:   {:.1} ({} assessed)", overview.avg_score, overview.assessed);
            println!("Training hours:   {:.1}", overview.total_hours);
            println!("Mandatory:        {}", overview.mandatory);
            println!("Optional:         {}", overview.optional);
        }
        Commands::Options { json } => {
            let options: FilterOptions = dashboard.filter_options();
            if json {
                return print_json(&options);
            }
            println!("Branches:       {}", options.branches.join(", "));
            println!("District heads: {}", options.district_heads.join(", "));
            println!("Supervisors:    {}", options.supervisors.join(", "));
            println!("Courses:        {}", options.courses.join(", "));
            let types: Vec<String> = options.course_types.iter().map(|t| t.to_string()).collect();
            println!("Course types:   {}", types.join(", "));
        }
        Commands::Leaderboard { limit, json } => {
            let leaderboard = dashboard.snapshot().leaderboard;
            if json {
                return print_json(&leaderboard);
            }
            println!("Top trainees:");
            print!("{}", report::markdown_table(&leaderboard.trainees, limit));
            println!("\nTop branches:");
            print!("{}", report::markdown_table(&leaderboard.branches, limit));
            println!("\nTop supervisors:");
            print!("{}", report::markdown_table(&leaderboard.supervisors, limit));
        }
        Commands::AtRisk { json } => {
            let at_risk = dashboard.snapshot().insights.at_risk;
            if json {
                return print_json(&at_risk);
            }
            if at_risk.is_empty() {
                println!("No trainees below the at-risk thresholds.");
                return Ok(());
            }
            for trainee in &at_risk {
                println!("- {} ({})", trainee.name, trainee.branch);
                for reason in &trainee.reasons {
                    println!("    {reason}");
                }
            }
        }
        Commands::Courses { json } => {
            let snapshot = dashboard.snapshot();
            if json {
                return print_json(&serde_json::json!({
                    "needing_attention": snapshot.insights.courses,
                    "top_performing": snapshot.top_courses,
                }));
            }
            println!("Courses needing attention:");
            print!("{}", report::markdown_table(&snapshot.insights.courses, usize::MAX));
            println!("\nTop performing courses:");
            print!("{}", report::markdown_table(&snapshot.top_courses, usize::MAX));
        }
        Commands::Trends { json } => {
            let trends = dashboard.snapshot().trends;
            if json {
                return print_json(&trends);
            }
            print!("{}", report::markdown_table(&trends, usize::MAX));
        }
        Commands::Engagement { json } => {
            let engagement = dashboard.snapshot().engagement;
            if json {
                return print_json(&engagement);
            }
            print!("{}", report::markdown_table(&engagement.points, usize::MAX));
            println!(
                "\nMean hours {:.1}, mean post score {:.1}",
                engagement.mean_hours, engagement.mean_score
            );
        }
        Commands::Compare {
            field,
            left,
            right,
            json,
        } => {
            let comparison = dashboard.compare(field, &left, &right);
            if json {
                return print_json(&comparison);
            }
            println!("{:<18} {:>14} {:>14}", field.as_str(), left, right);
            let rows = [
                ("Trainees", comparison.left.trainees as f64, comparison.right.trainees as f64),
                ("Avg completion %", comparison.left.avg_completion, comparison.right.avg_completion),
                ("Avg post score", comparison.left.avg_score, comparison.right.avg_score),
                ("Improvement %", comparison.left.improvement_pct, comparison.right.improvement_pct),
                ("Training hours", comparison.left.total_hours, comparison.right.total_hours),
            ];
            for (label, l, r) in rows {
                println!("{label:<18} {l:>14.1} {r:>14.1}");
            }
        }
        Commands::Table {
            view,
            search,
            sort,
            descending,
            page,
            per_page,
        } => {
            let per_page = per_page.unwrap_or_else(|| view.default_page_size());
            let records = dashboard.filtered();
            let snapshot = dashboard.snapshot();
            visit_view(
                view,
                &records,
                &snapshot,
                PrintTable {
                    search,
                    sort,
                    descending,
                    page,
                    per_page,
                },
            )?;
        }
        Commands::Export { view, dir, name } => {
            let records = dashboard.filtered();
            let snapshot = dashboard.snapshot();
            visit_view(
                view,
                &records,
                &snapshot,
                ExportView {
                    sink: CsvExport::new(dir),
                    name,
                },
            )?;
        }
        Commands::Report { out } => {
            let snapshot = dashboard.snapshot();
            let report = report::build_report(&snapshot, dashboard.filters(), dashboard.thresholds());
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write report to {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
