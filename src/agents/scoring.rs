//! Heuristic scoring agent.
//!
//! Every legal action gets a score from the objective's still-unmet win
//! requirements; the highest score is played, ties going to the earliest
//! action. Passing scores zero, so the agent stops once nothing left is
//! worth doing. Forced penalties spend surplus tokens before cards.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cards::{CardCategory, CardDefinition, CardId};
use crate::core::{GameAction, GameState, InstanceId, Resource};
use crate::effects::{
    ActivationCost, ChoiceDescriptor, ChoiceKind, EffectAction, OptionTag, TargetingDescriptor,
};
use crate::objectives::WinCondition;
use crate::tables::DefinitionTables;
use crate::triggers::TriggerKind;
use crate::zones::Zone;

use super::Agent;

/// Heuristic weights.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Any play at all.
    pub base_play: f64,
    /// A Toy not played before, while distinct Toys are still needed.
    pub new_toy: f64,
    /// Per Spirit created while Spirits are needed.
    pub spirit: f64,
    /// Per Memory token created while Memory is needed.
    pub memory: f64,
    /// Per mana generated while effect mana is needed.
    pub mana: f64,
    /// Per card drawn.
    pub draw: f64,
    /// Casting any spell while a storm win is open.
    pub storm_spell: f64,
    /// Casting the storm spell once the storm count is high enough.
    pub finisher: f64,
    /// Per mana paid.
    pub cost_penalty: f64,
    /// Per token paid that the objective wants held.
    pub resource_cost: f64,
    /// Sacrificing a permanent.
    pub sacrifice_penalty: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            base_play: 0.5,
            new_toy: 3.0,
            spirit: 1.5,
            memory: 1.0,
            mana: 0.5,
            draw: 0.3,
            storm_spell: 1.0,
            finisher: 10.0,
            cost_penalty: 0.05,
            resource_cost: 1.0,
            sacrifice_penalty: 2.0,
        }
    }
}

/// Remaining requirements of the objective's win conditions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Needs {
    toys: u32,
    spirits: u32,
    memory: u32,
    mana: u32,
    hold_spirits: u32,
    hold_memory: u32,
    empty_deck: bool,
    storm: Option<(CardId, u32)>,
}

impl Needs {
    fn of(state: &GameState) -> Self {
        let mut needs = Self::default();
        let progress = &state.progress;
        let player = state.player(state.active_player);
        let objective = &state.objective;

        for win in std::iter::once(&objective.primary_win).chain(objective.alternative_win.as_ref()) {
            match win {
                WinCondition::PlayDistinctToysAndCreateSpirits { toys, spirits } => {
                    needs.toys = needs.toys.max(toys.saturating_sub(progress.distinct_toys()));
                    needs.spirits = needs.spirits.max(spirits.saturating_sub(progress.spirits_created));
                }
                WinCondition::ControlTokens { resource, count } => {
                    let missing = count.saturating_sub(player.resource(*resource));
                    match resource {
                        Resource::Spirits => {
                            needs.spirits = needs.spirits.max(missing);
                            needs.hold_spirits = needs.hold_spirits.max(*count);
                        }
                        Resource::Memory => {
                            needs.memory = needs.memory.max(missing);
                            needs.hold_memory = needs.hold_memory.max(*count);
                        }
                        Resource::Mana => needs.mana = needs.mana.max(missing),
                    }
                }
                WinCondition::EmptyDeckWithPermanentTypes { .. } => {
                    needs.empty_deck = player.zones.zone_size(Zone::Deck) > 0;
                    needs.toys = needs.toys.max(1);
                }
                WinCondition::GenerateManaFromEffects { mana } => {
                    needs.mana = needs.mana.max(mana.saturating_sub(progress.mana_from_effects));
                }
                WinCondition::CastSpellWithStorm { spell, min_storm } => {
                    needs.storm = Some((*spell, *min_storm));
                }
                WinCondition::CreateSpiritsTotal { spirits } => {
                    needs.spirits = needs.spirits.max(spirits.saturating_sub(progress.spirits_created));
                }
                WinCondition::Unrecognized => {}
            }
        }
        needs
    }
}

/// Scores actions against unmet win requirements.
pub struct ScoringAgent {
    tables: Arc<DefinitionTables>,
    weights: ScoringWeights,
}

impl ScoringAgent {
    #[must_use]
    pub fn new(tables: Arc<DefinitionTables>, weights: ScoringWeights) -> Self {
        Self { tables, weights }
    }

    fn definition(&self, state: &GameState, card: InstanceId) -> Option<&CardDefinition> {
        self.tables.cards.get(state.instance(card)?.card_id)
    }

    fn value_of_actions(&self, actions: &[EffectAction], needs: &Needs) -> f64 {
        let w = &self.weights;
        actions
            .iter()
            .map(|action| match action {
                EffectAction::CreateSpiritTokens { count } if needs.spirits > 0 => w.spirit * f64::from(*count),
                EffectAction::CreateMemoryTokens { count } if needs.memory > 0 => w.memory * f64::from(*count),
                EffectAction::AddMana { amount } if needs.mana > 0 => w.mana * f64::from(*amount),
                EffectAction::DrawCards { count } => w.draw * f64::from(*count),
                EffectAction::MillDeck { count } if needs.empty_deck => w.draw * f64::from(*count),
                EffectAction::ConvertTokens { to: Resource::Spirits, count, .. } if needs.spirits > 0 => {
                    w.spirit * f64::from(*count)
                }
                EffectAction::ConvertTokens { to: Resource::Memory, count, .. } if needs.memory > 0 => {
                    w.memory * f64::from(*count)
                }
                EffectAction::TransformToyToSpirits { spirits, .. } => {
                    let gain = if needs.spirits > 0 { w.spirit * f64::from(*spirits) } else { 0.0 };
                    gain - w.sacrifice_penalty
                }
                _ => 0.0,
            })
            .sum()
    }

    fn score_play(&self, state: &GameState, card: InstanceId, free: bool, needs: &Needs) -> f64 {
        let Some(def) = self.definition(state, card) else {
            return 0.0;
        };
        let w = &self.weights;
        let mut score = w.base_play;

        for (_, effect) in def.effects_for(TriggerKind::OnPlay) {
            score += self.value_of_actions(&effect.actions, needs);
        }

        match def.category {
            CardCategory::Toy => {
                if needs.toys > 0 && !state.progress.distinct_toys_played.contains(&def.id) {
                    score += w.new_toy;
                }
            }
            CardCategory::Spell => {
                if let Some((spell, min_storm)) = needs.storm {
                    if def.id == spell {
                        let ready = state.progress.storm_count_this_turn >= min_storm;
                        score += if ready { w.finisher } else { -w.finisher };
                    } else {
                        score += w.storm_spell;
                    }
                }
            }
            CardCategory::Ritual => {}
        }

        if !free {
            let tax = state.player(state.active_player).cost_tax;
            score -= w.cost_penalty * f64::from(def.cost + tax);
        }
        score
    }

    fn score_activation(&self, state: &GameState, card: InstanceId, index: usize, needs: &Needs) -> f64 {
        let Some(effect) = self.definition(state, card).and_then(|d| d.effect(index)) else {
            return 0.0;
        };
        let w = &self.weights;
        let mut score = w.base_play * 0.5 + self.value_of_actions(&effect.actions, needs);

        for cost in &effect.costs {
            score -= match cost {
                ActivationCost::PayMana { amount } => w.cost_penalty * f64::from(*amount),
                ActivationCost::PaySpirits { count } if needs.hold_spirits > 0 => {
                    w.resource_cost * f64::from(*count)
                }
                ActivationCost::PayMemory { count } if needs.hold_memory > 0 => {
                    w.resource_cost * f64::from(*count)
                }
                ActivationCost::SacrificeThis => w.sacrifice_penalty,
                ActivationCost::ExileFromDiscard { count } => 0.1 * f64::from(*count),
                _ => 0.0,
            };
        }
        score
    }

    fn card_value(&self, state: &GameState, card: InstanceId, needs: &Needs) -> f64 {
        let Some(def) = self.definition(state, card) else {
            return 0.0;
        };
        let mut value = match def.category {
            CardCategory::Toy if needs.toys > 0 && !state.progress.distinct_toys_played.contains(&def.id) => 3.0,
            CardCategory::Toy => 2.0,
            CardCategory::Ritual => 1.5,
            CardCategory::Spell if needs.storm.is_some_and(|(spell, _)| spell == def.id) => 5.0,
            CardCategory::Spell => 1.0,
        };
        if state.first_memory == Some(card) {
            value += 10.0;
        }
        value
    }
}

impl Agent for ScoringAgent {
    fn name(&self) -> &str {
        "scoring"
    }

    fn choose_action(&mut self, state: &GameState, legal: &[GameAction]) -> GameAction {
        let needs = Needs::of(state);
        let mut best = (0.0_f64, GameAction::Pass);

        for action in legal {
            let score = match *action {
                GameAction::PlayCard { card, free_toy } => self.score_play(state, card, free_toy, &needs),
                GameAction::ActivateAbility { card, effect_index } => {
                    self.score_activation(state, card, effect_index, &needs)
                }
                GameAction::Pass => 0.0,
            };
            if score > best.0 {
                best = (score, *action);
            }
        }
        best.1
    }

    fn make_choice(&mut self, state: &GameState, choice: &ChoiceDescriptor) -> usize {
        match choice.kind {
            ChoiceKind::DiscardOrSacrifice => {
                let needs = Needs::of(state);
                let spirits = state.player(state.active_player).spirits;
                let surplus = choice.find(|tag| {
                    matches!(tag, OptionTag::SacrificeSpirit { count } if spirits >= *count + needs.hold_spirits)
                });
                surplus
                    .or_else(|| choice.find(|tag| matches!(tag, OptionTag::Discard { .. })))
                    .unwrap_or(0)
            }
            ChoiceKind::YesNo => choice.find(|tag| matches!(tag, OptionTag::Yes)).unwrap_or(0),
            ChoiceKind::Number => choice.options.len().saturating_sub(1),
            ChoiceKind::Options => 0,
        }
    }

    fn choose_targets(&mut self, state: &GameState, request: &TargetingDescriptor) -> Vec<InstanceId> {
        let needs = Needs::of(state);
        let mut ranked: Vec<(f64, InstanceId)> = request
            .candidates
            .iter()
            .map(|id| (self.card_value(state, *id, &needs), *id))
            .collect();
        if request.purpose.is_loss() {
            ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
        } else {
            ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
        }
        ranked.into_iter().take(request.count).map(|(_, id)| id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerId;
    use crate::effects::{ChoiceOption, TargetPurpose};
    use crate::testing::{sample_state, sample_tables, toy_card, SPELL};

    fn agent() -> ScoringAgent {
        ScoringAgent::new(Arc::new(sample_tables()), ScoringWeights::default())
    }

    fn penalty(options: Vec<ChoiceOption>) -> ChoiceDescriptor {
        ChoiceDescriptor {
            kind: ChoiceKind::DiscardOrSacrifice,
            prompt: String::new(),
            options,
        }
    }

    #[test]
    fn test_prefers_new_toy_over_spell() {
        let mut state = sample_state();
        let spell = state.create_instance(SPELL, PlayerId::SOLO, Zone::Hand).unwrap();
        let toy = state.create_instance(toy_card(2), PlayerId::SOLO, Zone::Hand).unwrap();

        let legal = [GameAction::play(spell), GameAction::play(toy), GameAction::play_free(toy)];
        assert_eq!(agent().choose_action(&state, &legal), GameAction::play_free(toy));
    }

    #[test]
    fn test_sacrifices_surplus_spirits() {
        let mut state = sample_state();
        state.player_mut(PlayerId::SOLO).spirits = 2;
        let choice = penalty(vec![
            ChoiceOption::new("Discard 1", OptionTag::Discard { count: 1 }),
            ChoiceOption::new("Sacrifice 1", OptionTag::SacrificeSpirit { count: 1 }),
        ]);
        assert_eq!(agent().make_choice(&state, &choice), 1);
    }

    #[test]
    fn test_keeps_spirits_the_objective_holds() {
        let mut state = sample_state();
        let objective = crate::objectives::ObjectiveDefinition::new(
            crate::objectives::ObjectiveId(5),
            "Hoard",
            WinCondition::ControlTokens { resource: Resource::Spirits, count: 3 },
        );
        state.objective = Arc::new(objective);
        state.player_mut(PlayerId::SOLO).spirits = 2;

        let choice = penalty(vec![
            ChoiceOption::new("Discard 1", OptionTag::Discard { count: 1 }),
            ChoiceOption::new("Sacrifice 1", OptionTag::SacrificeSpirit { count: 1 }),
        ]);
        assert_eq!(agent().make_choice(&state, &choice), 0);
    }

    #[test]
    fn test_discards_least_valuable() {
        let mut state = sample_state();
        let toy = state.create_instance(toy_card(1), PlayerId::SOLO, Zone::Hand).unwrap();
        let spell = state.create_instance(SPELL, PlayerId::SOLO, Zone::Hand).unwrap();

        let request = TargetingDescriptor {
            purpose: TargetPurpose::Discard,
            prompt: String::new(),
            zone: Zone::Hand,
            candidates: vec![toy, spell],
            count: 1,
        };
        assert_eq!(agent().choose_targets(&state, &request), vec![spell]);

        let fetch = TargetingDescriptor {
            purpose: TargetPurpose::Fetch,
            ..request
        };
        assert_eq!(agent().choose_targets(&state, &fetch), vec![toy]);
    }
}
