//! Priority ordering of the final channel list

use crate::models::Channel;

/// Moves channels of preferred broadcasters to the front
///
/// This is a stable two-way partition, not a sort: channels whose name starts
/// with any configured prefix (case-insensitive) come first, everything else
/// follows, and both groups keep their incoming order.
#[derive(Debug, Clone)]
pub struct ChannelRanker {
    prefixes: Vec<String>,
}

impl ChannelRanker {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            prefixes: prefixes
                .into_iter()
                .map(|prefix| prefix.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn is_priority(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.prefixes.iter().any(|prefix| name.starts_with(prefix.as_str()))
    }

    pub fn rank(&self, channels: Vec<Channel>) -> Vec<Channel> {
        let (mut priority, remainder): (Vec<Channel>, Vec<Channel>) = channels
            .into_iter()
            .partition(|channel| self.is_priority(&channel.name));
        priority.extend(remainder);
        priority
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn channel(name: &str) -> Channel {
        Channel {
            id: name.to_string(),
            name: name.to_string(),
            country: "PT".to_string(),
            logo: None,
            stream_url: format!("http://stream/{name}"),
            headers: None,
        }
    }

    fn names(channels: &[Channel]) -> Vec<&str> {
        channels.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn priority_channels_move_to_front() {
        let ranker = ChannelRanker::new(["rtp", "sic", "artv", "tvi"]);
        let ranked = ranker.rank(
            ["Outro", "RTP1", "SIC Notícias", "TVI Ficção"]
                .into_iter()
                .map(channel)
                .collect(),
        );
        assert_eq!(names(&ranked), vec!["RTP1", "SIC Notícias", "TVI Ficção", "Outro"]);
    }

    #[test]
    fn buckets_keep_original_order() {
        let ranker = ChannelRanker::new(["sic", "rtp"]);
        let ranked = ranker.rank(
            ["Zeta", "SIC", "Alpha", "RTP2", "rtp1", "Beta"]
                .into_iter()
                .map(channel)
                .collect(),
        );
        assert_eq!(names(&ranked), vec!["SIC", "RTP2", "rtp1", "Zeta", "Alpha", "Beta"]);
    }

    #[rstest]
    #[case("RTP 1", true)]
    #[case("rtp África", true)]
    #[case("Sic Radical", true)]
    #[case("CNN Portugal", true)]
    #[case("Canal 11", false)]
    #[case("Porto Canal RTP", false)]
    fn prefix_match_is_case_insensitive(#[case] name: &str, #[case] expected: bool) {
        let ranker = ChannelRanker::new(["RTP", "sic", "artv", "tvi", "cnn"]);
        assert_eq!(ranker.is_priority(name), expected);
    }

    #[test]
    fn empty_prefix_list_is_identity() {
        let ranker = ChannelRanker::new(Vec::<String>::new());
        let ranked = ranker.rank(["B", "A"].into_iter().map(channel).collect());
        assert_eq!(names(&ranked), vec!["B", "A"]);
    }
}
