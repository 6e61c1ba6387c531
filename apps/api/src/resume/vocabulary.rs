//! Fixed vocabularies the resume analyzer matches against.

use std::collections::HashSet;
use std::sync::LazyLock;

use crate::models::job::ExperienceLevel;

/// Recognised technical skills, in the order multi-word hits are reported.
pub const TECH_SKILLS: &[&str] = &[
    // Programming languages
    "javascript", "typescript", "python", "java", "c++", "c#", "ruby", "go", "golang",
    "rust", "swift", "kotlin", "scala", "php", "perl", "r", "matlab", "sql", "bash",
    "shell", "powershell", "objective-c", "dart", "elixir", "clojure", "haskell",
    // Frontend
    "react", "reactjs", "react.js", "vue", "vuejs", "vue.js", "angular", "angularjs",
    "svelte", "nextjs", "next.js", "nuxt", "gatsby", "html", "html5", "css", "css3",
    "sass", "scss", "less", "tailwind", "tailwindcss", "bootstrap", "material-ui",
    "chakra", "styled-components", "redux", "mobx", "webpack", "vite", "rollup",
    // Backend
    "node", "nodejs", "node.js", "express", "expressjs", "fastify", "koa", "nestjs",
    "django", "flask", "fastapi", "rails", "ruby on rails", "spring", "spring boot",
    "laravel", "asp.net", ".net", "dotnet", "graphql", "rest", "restful", "api",
    // Databases
    "mongodb", "mongoose", "postgresql", "postgres", "mysql", "mariadb", "sqlite",
    "redis", "elasticsearch", "cassandra", "dynamodb", "firebase", "firestore",
    "supabase", "prisma", "sequelize", "typeorm", "knex", "sql server", "oracle",
    // Cloud & DevOps
    "aws", "amazon web services", "azure", "gcp", "google cloud", "heroku", "vercel",
    "netlify", "digitalocean", "docker", "kubernetes", "k8s", "jenkins", "gitlab",
    "github actions", "ci/cd", "terraform", "ansible", "puppet", "chef", "nginx",
    "apache", "linux", "ubuntu", "centos", "serverless", "lambda", "cloudflare",
    // Data & ML
    "machine learning", "ml", "deep learning", "tensorflow", "pytorch", "keras",
    "scikit-learn", "pandas", "numpy", "jupyter", "data science", "data analysis",
    "data engineering", "etl", "spark", "hadoop", "kafka", "airflow", "dbt",
    "tableau", "power bi", "looker", "nlp", "computer vision", "ai", "llm", "gpt",
    // Mobile
    "ios", "android", "react native", "flutter", "xamarin", "ionic", "cordova",
    "mobile development", "swift ui", "jetpack compose",
    // Tools & practices
    "git", "github", "bitbucket", "jira", "confluence", "agile", "scrum",
    "kanban", "tdd", "bdd", "testing", "jest", "mocha", "cypress", "selenium",
    "postman", "swagger", "openapi", "figma", "sketch", "adobe xd",
    // Concepts
    "microservices", "monolith", "architecture", "system design", "scalability",
    "performance", "optimization", "security", "authentication", "authorization",
    "oauth", "jwt", "cryptography", "blockchain", "web3", "solidity", "smart contracts",
];

pub static TECH_SKILL_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| TECH_SKILLS.iter().copied().collect());

pub fn is_tech_skill(term: &str) -> bool {
    TECH_SKILL_SET.contains(term)
}

/// Role categories and the keywords that signal them.
pub const ROLE_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "frontend",
        &["frontend", "front-end", "front end", "ui", "ux", "react", "vue", "angular", "css", "html"],
    ),
    (
        "backend",
        &["backend", "back-end", "back end", "api", "server", "node", "python", "java", "database"],
    ),
    ("fullstack", &["fullstack", "full-stack", "full stack"]),
    (
        "devops",
        &["devops", "sre", "infrastructure", "cloud", "kubernetes", "docker", "aws", "azure", "gcp"],
    ),
    (
        "data",
        &["data", "analytics", "ml", "machine learning", "data science", "data engineer", "etl"],
    ),
    (
        "mobile",
        &["mobile", "ios", "android", "react native", "flutter", "app development"],
    ),
    (
        "design",
        &["design", "ui", "ux", "figma", "sketch", "user experience", "user interface"],
    ),
    (
        "product",
        &["product", "product manager", "pm", "product management", "roadmap"],
    ),
    (
        "qa",
        &["qa", "quality", "testing", "test", "automation", "selenium", "cypress"],
    ),
];

/// A role category needs at least this many distinct keyword hits.
pub const MIN_ROLE_HITS: usize = 2;

/// Seniority bands in evaluation order. The first band with any hit wins.
pub const SENIORITY_KEYWORDS: &[(ExperienceLevel, &[&str])] = &[
    (
        ExperienceLevel::Intern,
        &["intern", "internship", "trainee", "apprentice"],
    ),
    (
        ExperienceLevel::Entry,
        &["junior", "entry", "entry-level", "associate", "graduate", "fresher", "0-2 years"],
    ),
    (
        ExperienceLevel::Mid,
        &["mid", "mid-level", "intermediate", "2-5 years", "3-5 years"],
    ),
    (
        ExperienceLevel::Senior,
        &["senior", "sr", "lead", "principal", "staff", "5+ years", "5-10 years"],
    ),
    (
        ExperienceLevel::Executive,
        &["director", "vp", "vice president", "head of", "chief", "cto", "ceo", "cfo"],
    ),
];

/// English stop words dropped before keyword ranking.
pub static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "about", "above", "after", "again", "all", "also", "am", "an", "and", "any", "are",
        "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
        "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each",
        "few", "for", "from", "further", "had", "has", "have", "having", "he", "her", "here",
        "hers", "herself", "him", "himself", "his", "how", "i", "if", "in", "into", "is",
        "it", "its", "itself", "just", "me", "more", "most", "my", "myself", "no", "nor",
        "not", "now", "of", "off", "on", "once", "only", "or", "other", "our", "ours",
        "ourselves", "out", "over", "own", "same", "she", "should", "so", "some", "such",
        "than", "that", "the", "their", "theirs", "them", "themselves", "then", "there",
        "these", "they", "this", "those", "through", "to", "too", "under", "until", "up",
        "very", "was", "we", "were", "what", "when", "where", "which", "while", "who",
        "whom", "why", "will", "with", "would", "you", "your", "yours", "yourself",
        "yourselves", "a",
    ]
    .into_iter()
    .collect()
});
