//! 抽出（リフレクション）用のプロンプトとバッチ指示
//!
//! 外部の推論エージェントに渡すテキストを組み立てる。出力の検証はしない。

use crate::domain::{DateKey, PendingInfo};

const TRUNCATION_NOTICE: &str = "[...truncated...]\n\n";

/// 抽出プロンプトのテンプレート。`{DATE}` `{CHARS}` `{LOG}` を置換する。
const REFLECTION_TEMPLATE: &str = r#"You are extracting insights from a daily memory log.

## Task
Read the log and extract a STRUCTURED summary with these MANDATORY sections.
Each section MUST be present even if the content is minimal.

## Output Format (ALL sections required)
```markdown
## {DATE} Insights

### Session Intent
[What was the main focus of the day? 1-2 sentences max]

### Files Modified
[List ALL files that were created/edited/deleted. If none mentioned, write "None recorded"]
- path/to/file: what changed

### Decisions Made
[Important choices with rationale]
- Decision: [what] / Reason: [why]

### Lessons Learned
[Mistakes and fixes: what went wrong and how to avoid it]
- **Problem**: [what went wrong]
- **Cause**: [root cause]
- **Fix**: [how to prevent]

### Patterns
[Recurring solutions or workflows that worked]
- **[pattern name]**: [description with concrete example]

### Open Items
[Unfinished tasks, things to follow up]
- [ ] item

### Statistics
- Log length: {CHARS} chars
- Decisions: N
- Lessons: N
- Files modified: N
```

## Extraction Rules
- Compress 10:1 (1000 chars of log become ~100 chars of insight)
- Keep [P0] markers for permanent rules
- Include concrete commands/paths/code when mentioned
- Skip trivial chatter, focus on learnings
- Output in the language of the log content
- **Files Modified is CRITICAL**: scan for any path like ~/*, /Users/*, *.py, *.sh, *.md

## Daily Log to Process
{LOG}
"#;

/// 末尾 max_chars 文字だけ残す（新しい記述を優先）。切った場合は先頭に注記を付ける。
pub fn truncate_recent(content: &str, max_chars: usize) -> (String, bool) {
    let total = content.chars().count();
    if total <= max_chars {
        return (content.to_string(), false);
    }
    let skip = total - max_chars;
    let start = content
        .char_indices()
        .nth(skip)
        .map(|(i, _)| i)
        .unwrap_or(content.len());
    (format!("{}{}", TRUNCATION_NOTICE, &content[start..]), true)
}

/// 抽出プロンプトを組み立てる。`chars` は切り詰め前のログ文字数。
pub fn render_prompt(date: &DateKey, log_excerpt: &str, chars: usize) -> String {
    REFLECTION_TEMPLATE
        .replace("{DATE}", &date.to_string())
        .replace("{CHARS}", &chars.to_string())
        .replace("{LOG}", log_excerpt)
}

/// 1 日分の処理手順（extract → save → done）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflectionStep {
    pub date: DateKey,
    pub chars: usize,
    pub extract: String,
    pub save: String,
    pub complete: String,
}

impl ReflectionStep {
    /// `program` は実行ファイル名（例: memlife）
    pub fn new(program: &str, info: &PendingInfo) -> Self {
        let date = info.date;
        Self {
            date,
            chars: info.chars,
            extract: format!("{} extract {}", program, date),
            save: format!("{} save {} --file <insights-file>", program, date),
            complete: format!("{} done {}", program, date),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchInstructions {
    Empty,
    Ready { steps: Vec<ReflectionStep> },
}

impl BatchInstructions {
    /// pending（昇順）から手順を作る
    pub fn build(program: &str, pending: &[PendingInfo]) -> Self {
        if pending.is_empty() {
            return BatchInstructions::Empty;
        }
        let steps = pending
            .iter()
            .map(|info| ReflectionStep::new(program, info))
            .collect();
        BatchInstructions::Ready { steps }
    }

    /// サブエージェントへ渡すタスク文
    pub fn render(&self) -> Option<String> {
        let BatchInstructions::Ready { steps } = self else {
            return None;
        };
        let mut out = String::from("Memory Reflection Task:\n\nProcess the logs for these dates:\n");
        for s in steps {
            out.push_str(&format!("- {}\n", s.date));
        }
        out.push_str("\nFor each date, in order:\n");
        for s in steps {
            out.push_str(&format!("\n## {}\n", s.date));
            out.push_str(&format!("1. Run: {}\n", s.extract));
            out.push_str("2. Follow the printed prompt and extract 3-7 insights\n");
            out.push_str(&format!("3. Run: {}\n", s.save));
            out.push_str(&format!("4. Run: {}\n", s.complete));
        }
        out.push_str(
            "\nRules:\n\
             - 10:1 compression\n\
             - Keep [P0] markers\n\
             - Include concrete commands/code\n\
             - Use the language of the log\n",
        );
        Some(out)
    }
}
