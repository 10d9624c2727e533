use crate::models::{Ballot, Round, Summary, VoteCount};
use log::{debug, info};
use std::collections::HashMap;

/// Tallies a closed poll with the cumulative-threshold method.
///
/// In round `r` every option is credited with the ballots that rank it at
/// position `r` or better. The round's leader wins when it is the only option
/// with the top count and that count exceeds `total / N` (floor division, `N`
/// being the option count). Round `N` always declares its leader. Ties for
/// the top count go to the option declared first.
pub fn calculate_results<'a, I>(options: &[String], ballots: I) -> Summary
where
    I: IntoIterator<Item = &'a Ballot>,
{
    let option_count = options.len();
    let index: HashMap<&str, usize> = options
        .iter()
        .enumerate()
        .map(|(i, option)| (option.as_str(), i))
        .collect();

    // Positions per ballot, resolved to option indices once.
    let placements: Vec<Vec<(usize, u32)>> = ballots
        .into_iter()
        .map(|ballot| {
            ballot
                .ranking
                .iter()
                .filter_map(|rank| index.get(rank.option.as_str()).map(|&i| (i, rank.position)))
                .collect()
        })
        .collect();

    let mut summary = Summary {
        rounds: Vec::with_capacity(option_count),
        winner: None,
        winner_vote_count: 0,
        total_vote_count: 0,
    };

    for round in 1..=option_count as u32 {
        let mut tally = vec![0u32; option_count];
        for ballot in &placements {
            for &(option, position) in ballot {
                if position <= round {
                    tally[option] += 1;
                }
            }
        }

        let mut max_option: Option<usize> = None;
        let mut max_count = 0u32;
        let mut is_unique = true;
        let mut total_count = 0u32;
        for (option, &count) in tally.iter().enumerate() {
            total_count += count;

            if count > max_count || max_option.is_none() {
                max_option = Some(option);
                max_count = count;
                is_unique = true;
            } else if count == max_count {
                is_unique = false;
            }
        }

        summary.rounds.push(
            options
                .iter()
                .zip(&tally)
                .map(|(option, &votes)| VoteCount {
                    option: option.clone(),
                    votes,
                })
                .collect::<Round>(),
        );

        let more_than_fraction = max_count > total_count / option_count as u32;
        debug!(
            "Round {}: {} > ({} / {}) = {}, unique = {}",
            round, max_count, total_count, option_count, more_than_fraction, is_unique
        );

        if (more_than_fraction && is_unique) || round as usize == option_count {
            // An all-zero final round has nobody to declare.
            summary.winner = max_option
                .filter(|_| max_count > 0)
                .map(|option| options[option].clone());
            summary.winner_vote_count = max_count;
            summary.total_vote_count = total_count;
            info!("Winner after round {}: {:?}", round, summary.winner);
            break;
        }
    }

    summary
}
