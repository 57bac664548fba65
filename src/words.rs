/// A word paired with a short definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordCard {
    pub word: &'static str,
    pub definition: &'static str,
}

const fn card(word: &'static str, definition: &'static str) -> WordCard {
    WordCard { word, definition }
}

/// Vocabulary quiz table
pub const QUIZ_QUESTIONS: &[WordCard] = &[
    card("ephemeral", "Lasting for a very short time"),
    card("ubiquitous", "Present, appearing, or found everywhere"),
    card("serendipity", "The occurrence of events by chance in a happy or beneficial way"),
    card("eloquent", "Fluent or persuasive in speaking or writing"),
    card("resilient", "Able to recover quickly from difficult conditions"),
    card("meticulous", "Showing great attention to detail; very careful and precise"),
    card("benevolent", "Well meaning and kindly"),
    card("candid", "Truthful and straightforward; frank"),
    card("diligent", "Having or showing care and conscientiousness in one's work"),
    card("gregarious", "Fond of company; sociable"),
    card("lethargic", "Sluggish and apathetic"),
    card("pragmatic", "Dealing with things sensibly and realistically"),
    card("tenacious", "Tending to keep a firm hold of something; persistent"),
    card("verbose", "Using or expressing more words than are needed"),
    card("ambiguous", "Open to more than one interpretation"),
    card("frugal", "Sparing or economical with regard to money or food"),
];

/// Candidates for the word of the day
pub const DAILY_WORDS: &[WordCard] = &[
    card("halcyon", "Denoting a period of time in the past that was idyllically happy and peaceful"),
    card("petrichor", "A pleasant smell that frequently accompanies the first rain after a long period of warm, dry weather"),
    card("sonder", "The realization that each passerby has a life as vivid and complex as your own"),
    card("luminous", "Full of or shedding light; bright or shining"),
    card("quixotic", "Exceedingly idealistic; unrealistic and impractical"),
    card("mellifluous", "Sweet or musical; pleasant to hear"),
    card("ineffable", "Too great or extreme to be expressed or described in words"),
    card("sanguine", "Optimistic or positive, especially in an apparently bad situation"),
    card("ebullient", "Cheerful and full of energy"),
    card("wanderlust", "A strong desire to travel"),
];
