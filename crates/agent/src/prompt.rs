//! Prompt texts used by the agent loop.

/// Default system prompt: turn a professional profile into structured marketing JSON.
pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are a marketing copywriter who specialises in professional profiles.
You receive a self-introduction written by an expert, and possibly links to their websites or portfolios.

Use the fetch_url_content tool to read every link that is mentioned or supplied before you write anything.
Use web_search with a full URL when you need a page that was not provided. Treat fetched pages as the
primary source of facts and never invent credentials, clients or awards.

Answer with a single JSON object and nothing else, using this shape:
{
  "name": string,
  "title": string,
  "headline": string,
  "summary": string,
  "expertise": [string],
  "services": [{"name": string, "description": string}],
  "achievements": [string],
  "experience": [{"role": string, "organization": string, "period": string}],
  "education": [string],
  "languages": [string],
  "contact": {"emails": [string], "phones": [string], "websites": [string]},
  "socialLinks": [string],
  "keywords": [string],
  "sources": [string]
}
Use empty strings or empty arrays for anything the sources do not support."#;

/// Prefix of the user message carrying the raw profile text.
pub fn profile_message(input: &str) -> String {
    format!("Here is the expert's self-introduction:\n{input}")
}

/// Instruction to fetch every supplied and mentioned URL before analyzing.
pub fn url_instruction(urls: &[String]) -> String {
    format!(
        "Links provided by the expert: {}\n\n\
         Do the following now:\n\
         1. Check the self-introduction for any links and note all of them.\n\
         2. Merge them with the links provided above, drop duplicates, then call fetch_url_content for every remaining link.\n\
         3. Analyze the fetched website content.\n\
         4. Return the analysis in the required JSON format.\n\n\
         Start fetching now:",
        urls.join(", ")
    )
}

/// Final instruction before the JSON-only call.
pub const FINAL_JSON_INSTRUCTION: &str = "Based on the website content fetched above, return the analysis in the \
     required JSON format. Make sure the response is complete and is valid JSON.";

/// Returned by `web_search` for keyword queries when no search backend is configured.
pub const SEARCH_SUGGESTION: &str = "Provide a full http(s) URL to fetch page content";
