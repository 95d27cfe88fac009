//! Static term tables: alias groups for synonym matching, skill families for
//! adjacency, and behavioural evidence for soft skills.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::analysis::keywords::normalize;

/// Each group lists interchangeable spellings; the first entry is the canonical form.
const ALIAS_GROUPS: &[&[&str]] = &[
    &["javascript", "js", "ecmascript", "es6"],
    &["typescript", "ts"],
    &["node.js", "nodejs", "node"],
    &["react", "react.js", "reactjs"],
    &["vue", "vue.js", "vuejs"],
    &["postgresql", "postgres", "psql"],
    &["mongodb", "mongo"],
    &["kubernetes", "k8s"],
    &["aws", "amazon web services"],
    &["gcp", "google cloud", "google cloud platform"],
    &["azure", "microsoft azure"],
    &["machine learning", "ml"],
    &["artificial intelligence", "ai"],
    &["natural language processing", "nlp"],
    &["ci/cd", "cicd", "continuous integration", "continuous delivery", "continuous deployment"],
    &["c#", "csharp"],
    &["c++", "cpp"],
    &["golang", "go"],
    &["rest", "restful", "rest api", "restful api"],
    &["user experience", "ux"],
    &["user interface", "ui"],
    &["infrastructure as code", "iac"],
    &["object-oriented programming", "oop", "object oriented programming"],
    &["search engine optimization", "seo"],
    &["microsoft excel", "excel"],
    &["customer relationship management", "crm"],
    &["key performance indicators", "kpis", "kpi"],
    &["quality assurance", "qa"],
    &["project management", "project manager", "program management"],
];

/// Families of related skills. Evidence of one member suggests adjacent experience with the others.
const SKILL_FAMILIES: &[(&str, &[&str])] = &[
    (
        "devops",
        &[
            "devops", "docker", "kubernetes", "terraform", "ansible", "jenkins", "ci/cd",
            "github actions", "helm", "containers", "infrastructure as code",
        ],
    ),
    (
        "cloud",
        &["cloud", "aws", "azure", "gcp", "lambda", "s3", "ec2", "serverless"],
    ),
    (
        "backend",
        &[
            "backend", "python", "java", "golang", "rust", "node.js", "rest", "graphql",
            "microservices", "django", "flask", "spring", "postgresql", "mysql", "sql",
        ],
    ),
    (
        "frontend",
        &[
            "frontend", "javascript", "typescript", "react", "vue", "angular", "html", "css",
            "svelte", "next.js",
        ],
    ),
    (
        "data",
        &[
            "data", "sql", "postgresql", "mysql", "pandas", "spark", "etl", "airflow", "tableau",
            "microsoft excel", "analytics", "data pipelines",
        ],
    ),
    (
        "ml",
        &[
            "machine learning", "pytorch", "tensorflow", "scikit-learn", "deep learning",
            "natural language processing", "computer vision", "artificial intelligence",
        ],
    ),
    (
        "mobile",
        &["mobile", "swift", "kotlin", "ios", "android", "react native", "flutter"],
    ),
    (
        "delivery",
        &[
            "agile", "scrum", "kanban", "jira", "roadmap", "project management",
            "stakeholder management", "sprint planning",
        ],
    ),
    (
        "security",
        &["security", "owasp", "penetration testing", "iam", "encryption", "soc 2"],
    ),
];

/// Soft skills and the action verbs that honestly evidence them.
const SOFT_SKILL_EVIDENCE: &[(&str, &[&str])] = &[
    ("leadership", &["led", "managed", "mentored", "supervised", "directed", "coached"]),
    ("mentoring", &["mentored", "coached", "trained", "onboarded"]),
    ("communication", &["presented", "documented", "wrote", "communicated", "authored"]),
    ("collaboration", &["collaborated", "partnered", "cross-functional", "coordinated"]),
    ("teamwork", &["collaborated", "partnered", "team", "coordinated"]),
    ("problem solving", &["resolved", "debugged", "diagnosed", "troubleshot", "optimized"]),
    ("ownership", &["owned", "drove", "launched", "delivered"]),
    ("stakeholder management", &["stakeholders", "clients", "partnered", "negotiated"]),
];

static ALIAS_INDEX: LazyLock<HashMap<&'static str, usize>> = LazyLock::new(|| {
    let mut index = HashMap::new();
    for (group_idx, group) in ALIAS_GROUPS.iter().enumerate() {
        for alias in group.iter() {
            index.insert(*alias, group_idx);
        }
    }
    index
});

/// All spellings equivalent to `term` other than `term` itself.
pub fn aliases_of(term: &str) -> Vec<&'static str> {
    let term = normalize(term);
    match ALIAS_INDEX.get(term.as_str()) {
        Some(&group) => ALIAS_GROUPS[group]
            .iter()
            .copied()
            .filter(|alias| *alias != term)
            .collect(),
        None => Vec::new(),
    }
}

/// Canonical spelling for `term`, or the normalized term when it has no alias group.
pub fn canonical(term: &str) -> String {
    let term = normalize(term);
    match ALIAS_INDEX.get(term.as_str()) {
        Some(&group) => ALIAS_GROUPS[group][0].to_string(),
        None => term,
    }
}

/// Skill families (name, members) a term belongs to, either by membership or by naming the family.
pub fn families_of(term: &str) -> Vec<(&'static str, &'static [&'static str])> {
    let canon = canonical(term);
    let normalized = normalize(term);
    SKILL_FAMILIES
        .iter()
        .filter(|(name, members)| {
            members.contains(&canon.as_str())
                || normalized.split_whitespace().any(|word| word == *name)
        })
        .copied()
        .collect()
}

/// Evidence verbs for a soft skill, if the skill is known.
pub fn soft_skill_evidence(term: &str) -> Option<&'static [&'static str]> {
    let normalized = normalize(term);
    SOFT_SKILL_EVIDENCE
        .iter()
        .find(|(skill, _)| normalized.contains(skill))
        .map(|(_, verbs)| *verbs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_exclude_self() {
        let aliases = aliases_of("Kubernetes");
        assert_eq!(aliases, vec!["k8s"]);
    }

    #[test]
    fn test_aliases_from_non_canonical_spelling() {
        let aliases = aliases_of("postgres");
        assert!(aliases.contains(&"postgresql"));
        assert!(aliases.contains(&"psql"));
        assert!(!aliases.contains(&"postgres"));
    }

    #[test]
    fn test_unknown_term_has_no_aliases() {
        assert!(aliases_of("underwater basket weaving").is_empty());
    }

    #[test]
    fn test_canonical_resolves_alias() {
        assert_eq!(canonical("K8s"), "kubernetes");
        assert_eq!(canonical("Haskell"), "haskell");
    }

    #[test]
    fn test_families_by_membership_and_by_name() {
        let names: Vec<_> = families_of("Kubernetes").iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["devops"]);

        let names: Vec<_> = families_of("cloud infrastructure").iter().map(|(n, _)| *n).collect();
        assert!(names.contains(&"cloud"));
    }

    #[test]
    fn test_soft_skill_evidence_lookup() {
        assert!(soft_skill_evidence("Team leadership").unwrap().contains(&"led"));
        assert!(soft_skill_evidence("attention to detail").is_none());
    }

    #[test]
    fn test_alias_groups_are_disjoint() {
        let mut seen = std::collections::HashSet::new();
        for group in ALIAS_GROUPS {
            for alias in group.iter() {
                assert!(seen.insert(*alias), "alias '{alias}' appears in two groups");
            }
        }
    }
}
