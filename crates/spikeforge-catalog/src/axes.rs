//! Generation axes: the four closed value sets spanning the generated space
//!
//! Axis order is fixed (library, pattern, style, language) and the value sets
//! are versioned together: adding a value to any table changes which
//! identifiers resolve, so the tables are the single source of truth for the
//! whole crate. Axis values never contain `-`, which keeps identifiers
//! reversible by plain splitting.

/// One of the four enumerable dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisKind {
    /// Primary library or framework
    Library,
    /// Scaffold pattern (what kind of code the spike produces)
    Pattern,
    /// Elaboration style
    Style,
    /// Target programming language
    Language,
}

impl AxisKind {
    /// Stable lowercase name of the axis
    pub fn as_str(&self) -> &'static str {
        match self {
            AxisKind::Library => "library",
            AxisKind::Pattern => "pattern",
            AxisKind::Style => "style",
            AxisKind::Language => "language",
        }
    }
}

/// Libraries and frameworks spikes can target
pub const LIBRARIES: &[&str] = &[
    "actix", "angular", "aspnet", "astro", "axum", "chi", "django", "drizzle", "echo", "express",
    "fastapi", "fastify", "fiber", "flask", "gin", "graphql", "grpc", "hapi", "jwt", "kafka",
    "knex", "koa", "ktor", "laravel", "micronaut", "mongodb", "mysql", "nats", "nestjs", "nextjs",
    "nuxt", "oauth", "phoenix", "postgres", "preact", "prisma", "quarkus", "qwik", "rabbitmq",
    "rails", "react", "redis", "remix", "rocket", "sequelize", "sinatra", "socketio", "solid",
    "spring", "sqlite", "stripe", "svelte", "sveltekit", "symfony", "tornado", "typeorm", "vapor",
    "vue", "warp", "websocket",
];

/// Scaffold patterns
pub const PATTERNS: &[&str] = &[
    "api", "auth", "cache", "client", "component", "config", "controller", "crud", "dashboard",
    "detail", "form", "hook", "job", "list", "logger", "login", "middleware", "migration",
    "modal", "model", "notification", "pagination", "queue", "repository", "rest", "router",
    "scheduler", "schema", "search", "seed", "service", "signup", "table", "upload", "validation",
    "webhook", "wizard", "worker",
];

/// Elaboration styles
pub const STYLES: &[&str] = &["advanced", "basic", "secure", "testing"];

/// Target languages
pub const LANGUAGES: &[&str] = &[
    "csharp", "dart", "elixir", "go", "java", "javascript", "kotlin", "php", "python", "ruby",
    "rust", "scala", "swift", "typescript",
];

/// How a generated spike is elaborated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Minimal scaffold
    Basic,
    /// Richer example code
    Advanced,
    /// Input-validation and auth-boundary scaffolding injected
    Secure,
    /// Accompanying test file generated
    Testing,
}

impl Style {
    /// Parse an axis value into a style
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "basic" => Some(Style::Basic),
            "advanced" => Some(Style::Advanced),
            "secure" => Some(Style::Secure),
            "testing" => Some(Style::Testing),
            _ => None,
        }
    }

    /// The axis value this style serializes to
    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Basic => "basic",
            Style::Advanced => "advanced",
            Style::Secure => "secure",
            Style::Testing => "testing",
        }
    }
}

/// Broad shape of the code a pattern scaffolds
///
/// Content synthesis is keyed by (category, style) so new patterns compose
/// with every style without pattern-specific string code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternCategory {
    /// Request/response handler flows
    Endpoint,
    /// Wiring and cross-cutting plumbing
    Service,
    /// Persistence and background data movement
    Data,
    /// User interface building blocks
    Ui,
    /// Outbound callers of other services
    Client,
}

impl PatternCategory {
    /// Stable lowercase name, used as a generated-spec tag
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternCategory::Endpoint => "endpoint",
            PatternCategory::Service => "service",
            PatternCategory::Data => "data",
            PatternCategory::Ui => "ui",
            PatternCategory::Client => "client",
        }
    }
}

/// Category a pattern belongs to
pub fn category_of(pattern: &str) -> PatternCategory {
    match pattern {
        "api" | "auth" | "crud" | "login" | "notification" | "pagination" | "rest" | "search"
        | "signup" | "upload" | "webhook" => PatternCategory::Endpoint,
        "cache" | "config" | "controller" | "logger" | "middleware" | "repository" | "router"
        | "service" | "validation" => PatternCategory::Service,
        "job" | "migration" | "model" | "queue" | "scheduler" | "schema" | "seed" | "worker" => {
            PatternCategory::Data
        }
        "component" | "dashboard" | "detail" | "form" | "hook" | "list" | "modal" | "table"
        | "wizard" => PatternCategory::Ui,
        _ => PatternCategory::Client,
    }
}

/// Statement-block convention of a language, for synthesized scaffolds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockSyntax {
    /// `{ ... }` blocks (C-family, JS-family, JVM, Go, Rust, Swift, Dart)
    Braces,
    /// Indentation blocks (Python)
    Indent,
    /// `def ... end` blocks (Ruby, Elixir)
    DefEnd,
}

/// Per-language conventions used by spec synthesis
#[derive(Debug, Clone, Copy)]
pub struct LanguageInfo {
    /// Axis value
    pub id: &'static str,
    /// Source file extension, without the dot
    pub ext: &'static str,
    /// Line comment prefix
    pub comment: &'static str,
    /// Conventional source directory
    pub src_dir: &'static str,
    /// Statement-block convention
    pub block: BlockSyntax,
}

const LANGUAGE_INFO: &[LanguageInfo] = &[
    lang("csharp", "cs", "//", "src", BlockSyntax::Braces),
    lang("dart", "dart", "//", "lib", BlockSyntax::Braces),
    lang("elixir", "ex", "#", "lib", BlockSyntax::DefEnd),
    lang("go", "go", "//", "internal", BlockSyntax::Braces),
    lang("java", "java", "//", "src", BlockSyntax::Braces),
    lang("javascript", "js", "//", "src", BlockSyntax::Braces),
    lang("kotlin", "kt", "//", "src", BlockSyntax::Braces),
    lang("php", "php", "//", "src", BlockSyntax::Braces),
    lang("python", "py", "#", "app", BlockSyntax::Indent),
    lang("ruby", "rb", "#", "lib", BlockSyntax::DefEnd),
    lang("rust", "rs", "//", "src", BlockSyntax::Braces),
    lang("scala", "scala", "//", "src", BlockSyntax::Braces),
    lang("swift", "swift", "//", "Sources", BlockSyntax::Braces),
    lang("typescript", "ts", "//", "src", BlockSyntax::Braces),
];

const fn lang(
    id: &'static str,
    ext: &'static str,
    comment: &'static str,
    src_dir: &'static str,
    block: BlockSyntax,
) -> LanguageInfo {
    LanguageInfo {
        id,
        ext,
        comment,
        src_dir,
        block,
    }
}

/// Conventions for a language axis value
pub fn language_info(language: &str) -> Option<&'static LanguageInfo> {
    LANGUAGE_INFO.iter().find(|l| l.id == language)
}

/// One point in the four-dimensional generated space
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisTuple {
    /// Library axis value
    pub library: String,
    /// Pattern axis value
    pub pattern: String,
    /// Style axis value
    pub style: Style,
    /// Language axis value
    pub language: String,
}
