//! Built-in word lists and tokenization for the heuristic checkers.

/// Function words. Recognized, but never a subject.
const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "among", "an",
    "and", "any", "are", "around", "as", "at", "be", "been", "before", "being", "below",
    "between", "both", "but", "by", "can", "could", "did", "do", "does", "doing", "during",
    "each", "either", "else", "few", "for", "from", "further", "had", "has", "have", "having",
    "he", "her", "here", "him", "his", "i", "if", "in", "into", "is", "its", "just", "kindly",
    "like", "many", "may", "me", "might", "more", "most", "much", "must", "my", "need", "needs",
    "neither", "no", "nor", "not", "now", "of", "off", "on", "only", "or", "other", "our",
    "ours", "out", "over", "own", "per", "please", "same", "shall", "she", "should", "so",
    "some", "such", "than", "the", "their", "them", "then", "there", "they", "through", "to",
    "too", "under", "until", "up", "upon", "us", "very", "via", "vs", "versus", "want", "was",
    "we", "were", "will", "with", "within", "without", "would", "you", "your", "yours",
];

/// Interrogatives imply a read-style action on their own.
const INTERROGATIVES: &[&str] = &[
    "how", "what", "when", "where", "which", "who", "whom", "whose", "why",
];

/// Verbs that state what should be done.
const ACTION_VERBS: &[&str] = &[
    "add", "adjust", "aggregate", "allocate", "analyse", "analyze", "approve", "archive",
    "assign", "break", "calculate", "cancel", "change", "chart", "check", "close", "compare",
    "compute", "contrast", "count", "create", "decrease", "delete", "describe", "display",
    "download", "edit", "estimate", "evaluate", "explain", "export", "fetch", "filter", "find",
    "forecast", "generate", "get", "give", "graph", "group", "identify", "increase", "insert",
    "list", "lookup", "mark", "measure", "modify", "monitor", "open", "plot", "predict",
    "project", "pull", "raise", "rank", "read", "reduce", "remove", "rename", "report",
    "retrieve", "review", "run", "see", "segment", "set", "show", "sort", "split", "summarise",
    "summarize", "tell", "track", "update", "view", "visualize",
];

/// Nouns too generic to name what the request is about.
const AMBIGUOUS: &[&str] = &[
    "anything", "detail", "details", "everything", "info", "information", "it", "item", "items",
    "one", "ones", "record", "records", "result", "results", "something", "stat", "stats",
    "status", "stuff", "that", "these", "thing", "things", "this", "those", "value", "values",
    "data",
];

/// Words that bound a request in time, place or quantity.
const SCOPE_MARKERS: &[&str] = &[
    "annual", "annually", "bottom", "current", "daily", "day", "days", "first", "hour", "hours",
    "last", "latest", "month", "monthly", "months", "next", "past", "previous", "q1", "q2",
    "q3", "q4", "quarter", "quarterly", "quarters", "recent", "since", "today", "tomorrow",
    "top", "week", "weekly", "weeks", "year", "yearly", "years", "yesterday", "ytd", "mtd",
    "january", "february", "march", "april", "june", "july", "august", "september", "october",
    "november", "december",
];

/// Common business vocabulary, recognized for coherence.
const COMMON: &[&str] = &[
    "account", "accounts", "amount", "average", "avg", "balance", "best", "budget", "by",
    "campaign", "category", "channel", "city", "cities", "client", "cost", "country", "customer",
    "department", "employee", "expense", "forecast", "growth", "headcount", "hello", "high",
    "higher", "inventory", "invoice", "level", "low", "lower", "margin", "market", "maximum",
    "metric", "minimum", "number", "order", "percentage", "performance", "price", "product",
    "profit", "quantity", "rate", "region", "revenue", "sale", "sales", "score", "segment",
    "share", "spend", "staff", "stock", "store", "sum", "supplier", "target", "team", "total",
    "trend", "unit", "user", "vendor", "volume", "warehouse", "worst",
];

/// Lowercased word tokens. Possessive `'s` is dropped; digits are kept.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|raw| {
            let word = raw.trim_matches('\'');
            let word = word
                .strip_suffix("'s")
                .or_else(|| word.strip_suffix("'S"))
                .unwrap_or(word);
            word.replace('\'', "").to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect()
}

/// `orders` → `order`, leaving `ss`/short words alone.
#[must_use]
pub fn singular(word: &str) -> Option<&str> {
    if word.len() > 3 && !word.ends_with("ss") {
        word.strip_suffix('s')
    } else {
        None
    }
}

fn in_list(list: &[&str], word: &str) -> bool {
    list.contains(&word) || singular(word).is_some_and(|s| list.contains(&s))
}

#[must_use]
pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word)
}

#[must_use]
pub fn is_interrogative(word: &str) -> bool {
    INTERROGATIVES.contains(&word)
}

#[must_use]
pub fn is_action_verb(word: &str) -> bool {
    in_list(ACTION_VERBS, word)
}

#[must_use]
pub fn is_ambiguous(word: &str) -> bool {
    AMBIGUOUS.contains(&word)
}

#[must_use]
pub fn is_scope_marker(word: &str) -> bool {
    SCOPE_MARKERS.contains(&word) || word.chars().all(|c| c.is_ascii_digit())
}

/// Any built-in list knows the word.
#[must_use]
pub fn is_known(word: &str) -> bool {
    is_stopword(word)
        || is_interrogative(word)
        || is_action_verb(word)
        || is_ambiguous(word)
        || is_scope_marker(word)
        || in_list(COMMON, word)
}

/// Looks like keyboard mashing: no vowels at all, or four consonants in a row.
///
/// An `h` closing a `ch`/`ph`/`sh`/`th` digraph does not extend the run, and a
/// plural `s` is ignored.
#[must_use]
pub fn is_implausible(word: &str) -> bool {
    if word.chars().any(|c| c.is_ascii_digit()) || !word.is_ascii() {
        return false;
    }
    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
    if word.len() > 1 && !word.chars().any(is_vowel) {
        return true;
    }
    let stem = singular(word).unwrap_or(word);
    let mut run = 0;
    let mut prev = ' ';
    for c in stem.chars() {
        if is_vowel(c) {
            run = 0;
        } else if !(c == 'h' && matches!(prev, 'c' | 'p' | 's' | 't')) {
            run += 1;
            if run >= 4 {
                return true;
            }
        }
        prev = c;
    }
    false
}
