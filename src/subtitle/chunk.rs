// Reading-sized subtitle chunks for transcripts without timing

use super::ass::LINE_BREAK;

const SENTENCE_JOIN: &str = " | ";

/// Split on `.`, `!` or `?` followed by whitespace; punctuation stays with
/// its sentence.
pub fn split_into_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        let at_boundary = matches!(c, '.' | '!' | '?') && chars.peek().is_some_and(|next| next.is_whitespace());
        if at_boundary {
            push_trimmed(&mut sentences, &current);
            current.clear();
            while chars.peek().is_some_and(|next| next.is_whitespace()) {
                chars.next();
            }
        }
    }
    push_trimmed(&mut sentences, &current);

    sentences
}

fn push_trimmed(sentences: &mut Vec<String>, sentence: &str) {
    let trimmed = sentence.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Greedy word wrap into lines of at most `max_chars`. A word longer than
/// the limit gets a line of its own.
pub fn wrap_words(sentence: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in sentence.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
        } else if char_len(&line) + 1 + char_len(word) <= max_chars {
            line.push(' ');
            line.push_str(word);
        } else {
            lines.push(std::mem::take(&mut line));
            line.push_str(word);
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }

    lines
}

struct ChunkBuilder {
    max_chars: usize,
    chunks: Vec<String>,
    lines: Vec<String>,
}

impl ChunkBuilder {
    fn new(max_chars: usize) -> Self {
        Self {
            max_chars,
            chunks: Vec::new(),
            lines: Vec::new(),
        }
    }

    /// Rendered length of the open chunk, separators included
    fn len(&self) -> usize {
        let text: usize = self.lines.iter().map(|line| char_len(line)).sum();
        text + self.lines.len().saturating_sub(1) * char_len(LINE_BREAK)
    }

    fn flush(&mut self) {
        if !self.lines.is_empty() {
            self.chunks.push(self.lines.join(LINE_BREAK));
            self.lines.clear();
        }
    }

    fn push_line(&mut self, line: String) {
        if !self.lines.is_empty() && self.len() + char_len(LINE_BREAK) + char_len(&line) > 2 * self.max_chars {
            self.flush();
        }
        self.lines.push(line);
    }

    /// Short sentences share a line while it stays within the limit
    fn push_sentence(&mut self, sentence: &str) {
        let added = char_len(SENTENCE_JOIN) + char_len(sentence);
        let fits_chunk = self.len() + added <= 2 * self.max_chars;
        if let Some(last) = self.lines.last_mut() {
            if char_len(last) + added <= self.max_chars && fits_chunk {
                last.push_str(SENTENCE_JOIN);
                last.push_str(sentence);
                return;
            }
        }
        self.push_line(sentence.to_string());
    }

    fn finish(mut self) -> Vec<String> {
        self.flush();
        self.chunks
    }
}

/// Pack sentences into chunks of at most two lines' worth of text.
///
/// Lines never exceed `max_chars` and chunks never exceed `2 * max_chars`
/// (counting the `\N` and ` | ` separators), apart from single words that
/// are longer than the limit on their own.
pub fn create_subtitle_chunks(sentences: &[String], max_chars: usize) -> Vec<String> {
    let mut builder = ChunkBuilder::new(max_chars);

    for sentence in sentences {
        if char_len(sentence) > max_chars {
            for line in wrap_words(sentence, max_chars) {
                builder.push_line(line);
            }
        } else {
            builder.push_sentence(sentence);
        }
    }

    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOREM: &str = "The quick brown fox jumps over the lazy dog. It was not amused! \
        Why would anyone write a sentence that keeps going on and on well past any reasonable \
        subtitle width, forcing the wrapper to break it into several separate lines? Short one. \
        Another short one. And a final sentence that is also rather long to make things interesting.";

    fn assert_invariants(chunks: &[String], max: usize) {
        for chunk in chunks {
            assert!(char_len(chunk) <= 2 * max, "chunk too long: {:?}", chunk);
            for line in chunk.split(LINE_BREAK) {
                assert!(char_len(line) <= max, "line too long: {:?}", line);
            }
        }
    }

    #[test]
    fn test_sentence_split() {
        assert_eq!(
            split_into_sentences("Hello. How are you?  Fine!\nGood"),
            vec!["Hello.", "How are you?", "Fine!", "Good"]
        );
        assert_eq!(split_into_sentences("Version 2.5 is out."), vec!["Version 2.5 is out."]);
        assert!(split_into_sentences("   ").is_empty());
    }

    #[test]
    fn test_short_sentences_share_a_line() {
        let sentences = split_into_sentences("Hello. How are you?");
        assert_eq!(create_subtitle_chunks(&sentences, 42), vec!["Hello. | How are you?"]);
    }

    #[test]
    fn test_invariants_hold_across_limits() {
        let sentences = split_into_sentences(LOREM);
        for max in [12, 20, 32, 42, 80] {
            let chunks = create_subtitle_chunks(&sentences, max);
            assert!(!chunks.is_empty());
            assert_invariants(&chunks, max);
        }
    }

    #[test]
    fn test_no_words_lost() {
        let sentences = split_into_sentences(LOREM);
        let chunks = create_subtitle_chunks(&sentences, 20);
        let rebuilt: Vec<String> = chunks
            .iter()
            .flat_map(|c| c.split(LINE_BREAK))
            .flat_map(|line| line.split(SENTENCE_JOIN))
            .flat_map(|part| part.split_whitespace())
            .map(str::to_string)
            .collect();
        let original: Vec<&str> = LOREM.split_whitespace().collect();
        assert_eq!(rebuilt, original);
    }

    #[test]
    fn test_overlong_word_kept_whole() {
        let sentences = vec!["a Pneumonoultramicroscopicsilicovolcanoconiosis b".to_string()];
        let chunks = create_subtitle_chunks(&sentences, 10);
        assert!(chunks.iter().any(|c| c.contains("Pneumonoultramicroscopicsilicovolcanoconiosis")));
    }

    #[test]
    fn test_wrap_words() {
        assert_eq!(wrap_words("one two three four", 9), vec!["one two", "three", "four"]);
    }

    #[test]
    fn test_cjk_counts_chars_not_bytes() {
        let sentences = vec!["你好世界。".to_string(), "再见。".to_string()];
        assert_eq!(create_subtitle_chunks(&sentences, 12), vec!["你好世界。 | 再见。"]);
    }
}
