use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use regex::Regex;
use strsim::damerau_levenshtein;
use unicode_normalization::UnicodeNormalization;

use crate::embedding::EmbeddingProvider;
use crate::CanonicalSkill;

/// One canonical skill in the taxonomy.
///
/// NOTE: keep the synonym lists in sync with the chat widget's suggestion
/// vocabulary.
#[derive(Debug)]
pub struct TaxonomyEntry {
    pub name: &'static str,
    pub category: &'static str,
    pub synonyms: &'static [&'static str],
    pub related: &'static [&'static str],
}

static TAXONOMY: &[TaxonomyEntry] = &[
    // Programming languages
    TaxonomyEntry {
        name: "python",
        category: "language",
        synonyms: &["python3", "python 3", "py", "python2.7"],
        related: &["django", "flask", "pandas"],
    },
    TaxonomyEntry {
        name: "javascript",
        category: "language",
        synonyms: &["js", "java script", "ecmascript", "es6", "es2015"],
        related: &["typescript", "react", "nodejs"],
    },
    TaxonomyEntry {
        name: "typescript",
        category: "language",
        synonyms: &["ts", "type script"],
        related: &["javascript", "react", "angular"],
    },
    TaxonomyEntry {
        name: "java",
        category: "language",
        synonyms: &["java8", "java11", "java17", "openjdk"],
        related: &["spring", "kotlin"],
    },
    TaxonomyEntry {
        name: "csharp",
        category: "language",
        synonyms: &["c#", "c sharp", ".net", "dotnet"],
        related: &["azure"],
    },
    TaxonomyEntry {
        name: "cplusplus",
        category: "language",
        synonyms: &["c++", "cpp", "c plus plus"],
        related: &["rust"],
    },
    TaxonomyEntry {
        name: "golang",
        category: "language",
        synonyms: &["go", "go lang"],
        related: &["kubernetes", "docker"],
    },
    TaxonomyEntry {
        name: "rust",
        category: "language",
        synonyms: &["rust lang", "rust language"],
        related: &["cplusplus"],
    },
    TaxonomyEntry {
        name: "ruby",
        category: "language",
        synonyms: &["ruby on rails", "rails", "ror"],
        related: &["postgresql"],
    },
    TaxonomyEntry {
        name: "php",
        category: "language",
        synonyms: &["php7", "php8"],
        related: &["laravel", "mysql"],
    },
    TaxonomyEntry {
        name: "swift",
        category: "language",
        synonyms: &["ios swift", "swift lang"],
        related: &["kotlin"],
    },
    TaxonomyEntry {
        name: "kotlin",
        category: "language",
        synonyms: &["kotlin jvm", "kotlin lang"],
        related: &["java", "swift"],
    },
    // Frontend
    TaxonomyEntry {
        name: "react",
        category: "frontend",
        synonyms: &["reactjs", "react.js", "react js", "react18"],
        related: &["javascript", "typescript", "nextjs"],
    },
    TaxonomyEntry {
        name: "angular",
        category: "frontend",
        synonyms: &["angularjs", "angular.js", "angular2"],
        related: &["typescript"],
    },
    TaxonomyEntry {
        name: "vue",
        category: "frontend",
        synonyms: &["vue.js", "vuejs", "vue js", "vue3"],
        related: &["javascript"],
    },
    TaxonomyEntry {
        name: "nextjs",
        category: "frontend",
        synonyms: &["next.js", "next js"],
        related: &["react"],
    },
    TaxonomyEntry {
        name: "css",
        category: "frontend",
        synonyms: &["css3", "cascading style sheets"],
        related: &["sass", "tailwind"],
    },
    TaxonomyEntry {
        name: "sass",
        category: "frontend",
        synonyms: &["scss"],
        related: &["css"],
    },
    TaxonomyEntry {
        name: "tailwind",
        category: "frontend",
        synonyms: &["tailwindcss", "tailwind css"],
        related: &["css"],
    },
    // Backend frameworks
    TaxonomyEntry {
        name: "nodejs",
        category: "backend",
        synonyms: &["node.js", "node js", "node"],
        related: &["javascript", "express"],
    },
    TaxonomyEntry {
        name: "django",
        category: "backend",
        synonyms: &["django rest framework", "drf"],
        related: &["python", "postgresql"],
    },
    TaxonomyEntry {
        name: "flask",
        category: "backend",
        synonyms: &["python flask", "flask framework"],
        related: &["python", "fastapi"],
    },
    TaxonomyEntry {
        name: "fastapi",
        category: "backend",
        synonyms: &["fast api"],
        related: &["python", "flask"],
    },
    TaxonomyEntry {
        name: "express",
        category: "backend",
        synonyms: &["express.js", "expressjs", "express js"],
        related: &["nodejs"],
    },
    TaxonomyEntry {
        name: "spring",
        category: "backend",
        synonyms: &["spring boot", "springboot", "spring framework"],
        related: &["java"],
    },
    TaxonomyEntry {
        name: "laravel",
        category: "backend",
        synonyms: &["php laravel", "laravel framework"],
        related: &["php"],
    },
    // Databases
    TaxonomyEntry {
        name: "sql",
        category: "database",
        synonyms: &["structured query language", "sql queries"],
        related: &["postgresql", "mysql"],
    },
    TaxonomyEntry {
        name: "postgresql",
        category: "database",
        synonyms: &["postgres", "pg", "postgre sql"],
        related: &["sql", "mysql"],
    },
    TaxonomyEntry {
        name: "mysql",
        category: "database",
        synonyms: &["my sql", "mariadb"],
        related: &["sql", "postgresql"],
    },
    TaxonomyEntry {
        name: "mongodb",
        category: "database",
        synonyms: &["mongo", "mongo db"],
        related: &["nodejs"],
    },
    TaxonomyEntry {
        name: "redis",
        category: "database",
        synonyms: &["redis cache"],
        related: &["postgresql"],
    },
    TaxonomyEntry {
        name: "elasticsearch",
        category: "database",
        synonyms: &["elastic search"],
        related: &["kibana"],
    },
    // Cloud platforms
    TaxonomyEntry {
        name: "aws",
        category: "cloud",
        synonyms: &["amazon web services", "amazon aws", "aws cloud"],
        related: &["terraform", "docker"],
    },
    TaxonomyEntry {
        name: "gcp",
        category: "cloud",
        synonyms: &["google cloud platform", "google cloud"],
        related: &["kubernetes"],
    },
    TaxonomyEntry {
        name: "azure",
        category: "cloud",
        synonyms: &["microsoft azure", "ms azure"],
        related: &["csharp"],
    },
    // DevOps
    TaxonomyEntry {
        name: "docker",
        category: "devops",
        synonyms: &["docker container", "containerization"],
        related: &["kubernetes", "aws"],
    },
    TaxonomyEntry {
        name: "kubernetes",
        category: "devops",
        synonyms: &["k8s", "kube"],
        related: &["docker", "terraform"],
    },
    TaxonomyEntry {
        name: "terraform",
        category: "devops",
        synonyms: &["infrastructure as code", "iac"],
        related: &["aws", "kubernetes"],
    },
    TaxonomyEntry {
        name: "git",
        category: "devops",
        synonyms: &["version control", "github", "gitlab"],
        related: &["jenkins"],
    },
    TaxonomyEntry {
        name: "jenkins",
        category: "devops",
        synonyms: &["jenkins ci", "jenkins ci/cd"],
        related: &["git", "docker"],
    },
    // Data & ML
    TaxonomyEntry {
        name: "machine learning",
        category: "data",
        synonyms: &["ml", "artificial intelligence", "ai"],
        related: &["python", "tensorflow", "pytorch"],
    },
    TaxonomyEntry {
        name: "tensorflow",
        category: "data",
        synonyms: &["tensor flow", "tf"],
        related: &["machine learning", "pytorch"],
    },
    TaxonomyEntry {
        name: "pytorch",
        category: "data",
        synonyms: &["torch", "py torch"],
        related: &["machine learning", "tensorflow"],
    },
    TaxonomyEntry {
        name: "pandas",
        category: "data",
        synonyms: &["python pandas"],
        related: &["python", "numpy"],
    },
    TaxonomyEntry {
        name: "numpy",
        category: "data",
        synonyms: &["numerical python"],
        related: &["pandas", "python"],
    },
    TaxonomyEntry {
        name: "spark",
        category: "data",
        synonyms: &["apache spark", "pyspark"],
        related: &["kafka", "python"],
    },
    TaxonomyEntry {
        name: "kafka",
        category: "data",
        synonyms: &["apache kafka", "kafka streaming"],
        related: &["spark"],
    },
    // Testing
    TaxonomyEntry {
        name: "jest",
        category: "testing",
        synonyms: &["jest testing"],
        related: &["javascript", "cypress"],
    },
    TaxonomyEntry {
        name: "cypress",
        category: "testing",
        synonyms: &["cypress testing", "e2e testing"],
        related: &["jest"],
    },
    TaxonomyEntry {
        name: "pytest",
        category: "testing",
        synonyms: &["py test", "python testing"],
        related: &["python"],
    },
    // Mobile
    TaxonomyEntry {
        name: "react native",
        category: "mobile",
        synonyms: &["react-native", "reactnative", "rn"],
        related: &["react", "flutter"],
    },
    TaxonomyEntry {
        name: "flutter",
        category: "mobile",
        synonyms: &["dart flutter", "flutter framework"],
        related: &["react native"],
    },
];

/// Alias (lowercased) -> taxonomy entry, O(1) lookup.
static ALIAS_INDEX: LazyLock<HashMap<&'static str, &'static TaxonomyEntry>> =
    LazyLock::new(|| {
        let mut map = HashMap::new();
        for entry in TAXONOMY {
            map.insert(entry.name, entry);
            for synonym in entry.synonyms {
                map.insert(*synonym, entry);
            }
        }
        map
    });

/// Separator-stripped, NFKC-normalized alias keys to absorb minor spelling
/// variation ("node.js" vs "node js").
static COMPACT_INDEX: LazyLock<HashMap<String, &'static TaxonomyEntry>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    for (alias, entry) in ALIAS_INDEX.iter() {
        map.entry(compact_key(alias)).or_insert(*entry);
    }
    map
});

static WORD_TOKENS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z0-9#+.]+").expect("word token pattern compiles"));

fn nfkc_lower_trim(input: &str) -> String {
    input.nfkc().collect::<String>().trim().to_lowercase()
}

fn compact_key(input: &str) -> String {
    input
        .nfkc()
        .collect::<String>()
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, ' ' | '.' | '-' | '_' | '/' | ','))
        .collect()
}

fn fuzzy_lookup(compact: &str) -> Option<&'static TaxonomyEntry> {
    // Short tokens (go, java, rust) are matched only via exact/alias lookup;
    // fuzzing them produces far too many false positives.
    if compact.len() < 5 {
        return None;
    }

    let mut best: Option<(&'static TaxonomyEntry, usize)> = None;
    for (alias, entry) in COMPACT_INDEX.iter() {
        if alias.len() < 5 || entry.name.len() < 5 {
            continue;
        }

        let distance = damerau_levenshtein(compact, alias);
        if distance == 0 {
            return Some(*entry);
        }

        let len = compact.len().max(alias.len());
        let acceptable = distance == 1 || (len >= 8 && distance == 2);
        if !acceptable {
            continue;
        }

        // Ties on distance resolve alphabetically so the result does not
        // depend on hash map iteration order.
        match best {
            Some((held, held_dist))
                if held_dist < distance
                    || (held_dist == distance && held.name <= entry.name) => {}
            _ => best = Some((*entry, distance)),
        }
    }

    best.map(|(entry, _)| entry)
}

fn lookup_token(token: &str) -> Option<&'static TaxonomyEntry> {
    if token.is_empty() {
        return None;
    }
    if let Some(entry) = ALIAS_INDEX.get(token) {
        return Some(*entry);
    }
    let compact = compact_key(token);
    if let Some(entry) = COMPACT_INDEX.get(&compact) {
        return Some(*entry);
    }
    fuzzy_lookup(&compact)
}

/// Look up the taxonomy entry for a skill mention, if one exists.
pub fn lookup(skill: &str) -> Option<&'static TaxonomyEntry> {
    let normalized = nfkc_lower_trim(skill);
    if let Some(entry) = lookup_token(&normalized) {
        return Some(entry);
    }

    normalized
        .split(|c: char| matches!(c, '/' | ',' | ';' | '|' | '&' | '+'))
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .find_map(lookup_token)
}

/// Normalize a skill mention to its canonical form. Unknown skills are
/// lowercased and trimmed but otherwise passed through.
pub fn normalize_skill(skill: &str) -> String {
    match lookup(skill) {
        Some(entry) => entry.name.to_string(),
        None => nfkc_lower_trim(skill),
    }
}

/// Normalize a list of skill mentions into a deduplicated, ordered set.
pub fn normalize_skill_set(skills: &[String]) -> BTreeSet<String> {
    skills
        .iter()
        .filter(|s| !s.trim().is_empty())
        .map(|s| normalize_skill(s))
        .collect()
}

/// Category of a skill, "other" when it is not in the taxonomy.
pub fn skill_category(skill: &str) -> &'static str {
    lookup(skill).map(|entry| entry.category).unwrap_or("other")
}

/// Related skills for a canonical or synonym mention.
pub fn related_skills(skill: &str) -> Vec<String> {
    lookup(skill)
        .map(|entry| entry.related.iter().map(|s| s.to_string()).collect())
        .unwrap_or_default()
}

/// Extract canonical skill names from free text, in order of first mention.
///
/// Scans word windows of up to three tokens so multi-word aliases
/// ("machine learning", "react native") are found alongside single tokens.
pub fn extract_skills(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let lowered = text.to_lowercase();
    let tokens: Vec<&str> = WORD_TOKENS
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .collect();

    let mut seen = BTreeSet::new();
    let mut extracted = Vec::new();

    for start in 0..tokens.len() {
        for window in 1..=3usize.min(tokens.len() - start) {
            let candidate = tokens[start..start + window].join(" ");
            // Exact alias lookup only; fuzzy matching over every window of
            // running prose would hallucinate skills.
            let hit = ALIAS_INDEX
                .get(candidate.as_str())
                .or_else(|| COMPACT_INDEX.get(&compact_key(&candidate)));
            if let Some(entry) = hit {
                if seen.insert(entry.name) {
                    extracted.push(entry.name.to_string());
                }
            }
        }
    }

    extracted
}

/// Proficiency heuristic from overall experience.
pub fn proficiency_for_experience(years: u32) -> &'static str {
    if years < 1 {
        "beginner"
    } else if years < 3 {
        "intermediate"
    } else if years < 5 {
        "advanced"
    } else {
        "expert"
    }
}

/// Normalize raw skill mentions into canonical skills with cached
/// embeddings, deduplicated by canonical name and ordered by first mention.
pub fn canonicalize(raw: &[String], provider: &dyn EmbeddingProvider) -> Vec<CanonicalSkill> {
    let mut seen = BTreeSet::new();
    let mut skills = Vec::new();

    for mention in raw {
        if mention.trim().is_empty() {
            continue;
        }
        let name = normalize_skill(mention);
        if !seen.insert(name.clone()) {
            continue;
        }
        let embedding = provider.embed(&name);
        skills.push(CanonicalSkill {
            category: skill_category(&name).to_string(),
            name,
            embedding,
        });
    }

    skills
}
