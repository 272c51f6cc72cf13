//! The effect interpreter.
//!
//! ## Execution model
//!
//! Resolution runs a stack of [`Frame`]s. A frame is an ordered action list,
//! a cursor into it and the context the actions run with. Each step takes
//! the next action of the top frame and executes it:
//!
//! - most actions mutate state and continue
//! - nested lists (conditional branches, dice outcomes, triggered effects)
//!   are pushed as new frames and run before the rest of the current list
//! - a player decision suspends the run: the whole stack is handed back to
//!   the caller inside a [`PendingChoice`] and resumed with the agent's
//!   [`ChoiceResponse`]
//!
//! Because the stack is owned data, suspension needs no callbacks or
//! coroutines, and the same state plus the same responses always replays
//! the same way.
//!
//! Action kinds other than control flow are dispatched through a table of
//! [`ActionHandler`]s keyed by [`ActionKind`]. A kind with no handler is
//! logged and skipped. `PLAYER_CHOICE` is part of the engine itself, so a
//! decision point is offered even when the actions behind it are not.
//!
//! After every action the Win/Loss Checker runs; once the game is over the
//! remaining frames are dropped.

use log::{debug, warn};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::cards::CardId;
use crate::core::{GameState, InstanceId, LogEvent, PlayerId, RulesConfig};
use crate::error::{Result, SimError};
use crate::rules::WinLossChecker;
use crate::tables::DefinitionTables;
use crate::triggers::{Condition, ConditionContext, ConditionEvaluator, GameEvent, TriggerKind};
use crate::zones::Zone;

use super::choice::{
    ChoiceDescriptor, ChoiceKind, ChoiceOption, ChoiceResponse, Decision, OptionTag,
};
use super::effect::{ActionKind, Effect, EffectAction, PlayerChoiceSpec};
use super::handlers;

/// Largest number of options a `NUMBER` choice offers; higher values of
/// its range are dropped.
pub const MAX_NUMBER_OPTIONS: u32 = 64;

/// Executes one action. Handlers receive the engine so they can raise
/// events, play cards and resolve targets.
pub type ActionHandler =
    fn(&EffectEngine<'_>, &mut GameState, &EffectAction, &EffectContext) -> Result<Step>;

/// Who and what an action list runs for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EffectContext {
    pub player: PlayerId,
    /// The card whose effect this is; `None` for objective and system effects.
    pub source: Option<InstanceId>,
    /// The event that triggered the effect.
    pub event: Option<GameEvent>,
    /// Cards an agent picked for the action being re-run after a targeting
    /// decision. Empty everywhere else.
    pub chosen: SmallVec<[InstanceId; 4]>,
}

impl EffectContext {
    #[must_use]
    pub fn new(player: PlayerId, source: Option<InstanceId>, event: Option<GameEvent>) -> Self {
        Self {
            player,
            source,
            event,
            chosen: SmallVec::new(),
        }
    }

    /// The same context with no bound targets.
    #[must_use]
    pub fn unbound(&self) -> Self {
        Self {
            chosen: SmallVec::new(),
            ..self.clone()
        }
    }

    /// A condition context over `state` for this effect.
    #[must_use]
    pub fn conditions<'a>(&'a self, state: &'a GameState) -> ConditionContext<'a> {
        ConditionContext::new(state, self.player)
            .with_source(self.source)
            .with_event(self.event.as_ref())
    }
}

/// Once-per-turn / once-per-game bookkeeping for one effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Usage {
    pub source: InstanceId,
    pub card: CardId,
    pub effect_index: usize,
    pub per_turn: bool,
    pub per_game: bool,
}

impl Usage {
    /// Usage limits of `effect`, if it has any.
    #[must_use]
    pub fn of(effect: &Effect, source: InstanceId, card: CardId, effect_index: usize) -> Option<Self> {
        (effect.once_per_turn || effect.once_per_game).then_some(Self {
            source,
            card,
            effect_index,
            per_turn: effect.once_per_turn,
            per_game: effect.once_per_game,
        })
    }

    /// Can the effect still be used?
    #[must_use]
    pub fn available(&self, state: &GameState) -> bool {
        let turn_used = self.per_turn
            && state
                .instance(self.source)
                .is_some_and(|card| card.used(self.effect_index));
        let game_used = self.per_game && state.used_once_per_game(self.card, self.effect_index);
        !turn_used && !game_used
    }

    pub fn mark(&self, state: &mut GameState) {
        if self.per_turn {
            if let Some(card) = state.instance_mut(self.source) {
                card.used_this_turn.push(self.effect_index);
            }
        }
        if self.per_game {
            state.mark_once_per_game(self.card, self.effect_index);
        }
    }
}

/// Work done when a frame finishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameExit {
    /// Move a resolved spell from the set-aside zone to the discard pile.
    SettleSpell(InstanceId),
}

/// An action list being executed.
#[derive(Clone, Debug)]
pub struct Frame {
    actions: Vec<EffectAction>,
    next: usize,
    ctx: EffectContext,
    /// Checked once, when the frame first runs.
    gate: Vec<Condition>,
    usage: Option<Usage>,
    started: bool,
    on_exit: Option<FrameExit>,
}

impl Frame {
    /// An ungated action list.
    #[must_use]
    pub fn new(actions: Vec<EffectAction>, ctx: EffectContext) -> Self {
        Self {
            actions,
            next: 0,
            ctx,
            gate: Vec::new(),
            usage: None,
            started: false,
            on_exit: None,
        }
    }

    /// A nested list inheriting `ctx` (minus bound targets).
    #[must_use]
    pub fn child(actions: Vec<EffectAction>, ctx: &EffectContext) -> Self {
        Self::new(actions, ctx.unbound())
    }

    /// An effect's action list, gated by its conditions and usage limits.
    #[must_use]
    pub fn for_effect(effect: &Effect, ctx: EffectContext, usage: Option<Usage>) -> Self {
        Self {
            gate: effect.conditions.clone(),
            usage,
            ..Self::new(effect.actions.clone(), ctx)
        }
    }

    #[must_use]
    pub fn with_exit(mut self, exit: FrameExit) -> Self {
        self.on_exit = Some(exit);
        self
    }

    #[must_use]
    pub fn context(&self) -> &EffectContext {
        &self.ctx
    }

    fn finished(&self) -> bool {
        self.next >= self.actions.len()
    }
}

/// How an action affects the run.
#[derive(Debug)]
pub enum Step {
    Continue,
    /// Run these frames (first element first) before continuing.
    Push(Vec<Frame>),
    /// Stop and ask the agent.
    Suspend(Decision, Resume),
}

impl Step {
    /// `Push`, or `Continue` when there is nothing to push.
    #[must_use]
    pub fn frames(frames: Vec<Frame>) -> Self {
        if frames.is_empty() {
            Step::Continue
        } else {
            Step::Push(frames)
        }
    }
}

/// What to do with the agent's answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resume {
    /// Run the list matching the chosen option index.
    Branch(Vec<Vec<EffectAction>>),
    /// Run the list as many times as the chosen number.
    Repeat(Vec<EffectAction>),
    /// Re-run the action with the chosen cards bound.
    Bind(EffectAction),
}

/// A suspended resolution.
#[derive(Clone, Debug)]
pub struct PendingChoice {
    /// What the agent is asked.
    pub decision: Decision,
    resume: Resume,
    ctx: EffectContext,
    stack: Vec<Frame>,
}

impl PendingChoice {
    /// The player who must answer.
    #[must_use]
    pub fn player(&self) -> PlayerId {
        self.ctx.player
    }
}

/// Result of running the engine.
#[derive(Debug)]
pub enum Resolution {
    Complete,
    Pending(Box<PendingChoice>),
}

impl Resolution {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self, Resolution::Complete)
    }
}

/// Effect interpreter bound to one batch's definition tables.
pub struct EffectEngine<'a> {
    pub tables: &'a DefinitionTables,
    pub rules: &'a RulesConfig,
    handlers: FxHashMap<ActionKind, ActionHandler>,
}

impl<'a> EffectEngine<'a> {
    /// An engine with every built-in handler registered.
    #[must_use]
    pub fn new(tables: &'a DefinitionTables, rules: &'a RulesConfig) -> Self {
        let mut engine = Self {
            tables,
            rules,
            handlers: FxHashMap::default(),
        };
        handlers::register_defaults(&mut engine);
        engine
    }

    /// Install or replace the handler for `kind`.
    pub fn register(&mut self, kind: ActionKind, handler: ActionHandler) {
        self.handlers.insert(kind, handler);
    }

    /// Remove the handler for `kind`; actions of that kind become no-ops.
    pub fn unregister(&mut self, kind: ActionKind) -> Option<ActionHandler> {
        self.handlers.remove(&kind)
    }

    #[must_use]
    pub fn handles(&self, kind: ActionKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    // === Entry points ===

    /// Resolve one effect for `player`.
    ///
    /// With an event, the effect runs only if its trigger matches the event
    /// kind (an echo `ON_PLAY` effect also matches a re-entry from the
    /// discard pile). Without an event the trigger is not checked.
    pub fn resolve(
        &self,
        state: &mut GameState,
        effect: &Effect,
        player: PlayerId,
        source: Option<InstanceId>,
        event: Option<GameEvent>,
    ) -> Result<Resolution> {
        if let Some(event) = &event {
            let echo = effect.echo
                && effect.trigger == TriggerKind::OnPlay
                && event.kind == TriggerKind::OnEnterPlayFromDiscard;
            if event.kind != effect.trigger && !echo {
                return Ok(Resolution::Complete);
            }
        }
        let ctx = EffectContext::new(player, source, event);
        self.run(state, vec![Frame::for_effect(effect, ctx, None)])
    }

    /// Raise `event` and resolve every effect it triggers.
    pub fn fire(&self, state: &mut GameState, event: GameEvent) -> Result<Resolution> {
        let frames = self.raise(state, &event);
        self.run(state, frames)
    }

    /// Run a system action list (turn draw, hand-size discard) for `player`.
    pub fn perform(
        &self,
        state: &mut GameState,
        player: PlayerId,
        actions: Vec<EffectAction>,
    ) -> Result<Resolution> {
        let ctx = EffectContext::new(player, None, None);
        self.run(state, vec![Frame::new(actions, ctx)])
    }

    /// Continue a suspended resolution with the agent's answer.
    pub fn resume(
        &self,
        state: &mut GameState,
        pending: PendingChoice,
        response: &ChoiceResponse,
    ) -> Result<Resolution> {
        if !pending.decision.accepts(response) {
            return Err(SimError::RuleViolation(format!(
                "response {response:?} does not answer the pending decision"
            )));
        }

        let PendingChoice {
            decision,
            resume,
            ctx,
            mut stack,
        } = pending;

        let step = match (resume, response) {
            (Resume::Branch(mut branches), ChoiceResponse::Option(index)) => {
                let actions = if *index < branches.len() {
                    branches.swap_remove(*index)
                } else {
                    Vec::new()
                };
                Step::frames(vec![Frame::child(actions, &ctx)])
            }
            (Resume::Repeat(actions), ChoiceResponse::Option(index)) => {
                let times = match &decision {
                    Decision::Choice(choice) => match choice.options.get(*index).map(|o| o.tag) {
                        Some(OptionTag::Number(n)) => n as usize,
                        _ => 0,
                    },
                    Decision::Targets(_) => 0,
                };
                let repeated: Vec<_> = std::iter::repeat(actions).take(times).flatten().collect();
                Step::frames(vec![Frame::child(repeated, &ctx)])
            }
            (Resume::Bind(action), ChoiceResponse::Targets(ids)) => {
                let mut bound = ctx.unbound();
                bound.chosen.extend(ids.iter().copied());
                let step = self.execute(state, &action, &bound)?;
                WinLossChecker::check_wins(state, &self.tables.cards);
                step
            }
            (resume, response) => {
                return Err(SimError::Invariant(format!(
                    "cannot resume {resume:?} with {response:?}"
                )))
            }
        };

        match step {
            Step::Continue => {}
            Step::Push(frames) => push_frames(&mut stack, frames),
            Step::Suspend(decision, resume) => {
                return Ok(Resolution::Pending(Box::new(PendingChoice {
                    decision,
                    resume,
                    ctx,
                    stack,
                })))
            }
        }
        self.drive(state, stack)
    }

    /// Run `frames`, first element first.
    pub fn run(&self, state: &mut GameState, frames: Vec<Frame>) -> Result<Resolution> {
        let mut stack = Vec::with_capacity(frames.len() + 2);
        push_frames(&mut stack, frames);
        self.drive(state, stack)
    }

    // === Events ===

    /// Frames for every effect `event` triggers, in resolution order.
    #[must_use]
    pub fn raise(&self, state: &GameState, event: &GameEvent) -> Vec<Frame> {
        self.raise_where(state, event, |_| true)
    }

    fn raise_where(&self, state: &GameState, event: &GameEvent, keep: impl Fn(&Effect) -> bool) -> Vec<Frame> {
        let triggered = self.tables.triggers.collect(state, event);
        if !triggered.is_empty() {
            debug!("{:?} triggered {} effect(s)", event.kind, triggered.len());
        }
        triggered
            .into_iter()
            .filter_map(|t| {
                let effect = self.tables.cards.get(t.card)?.effect(t.effect_index)?;
                if !keep(effect) {
                    return None;
                }
                let ctx = EffectContext::new(t.player, Some(t.source), Some(event.clone()));
                let usage = Usage::of(effect, t.source, t.card, t.effect_index);
                Some(Frame::for_effect(effect, ctx, usage))
            })
            .collect()
    }

    /// Move a card and collect the frames its zone-change events trigger.
    pub fn move_and_raise(
        &self,
        state: &mut GameState,
        card: InstanceId,
        to: Zone,
        sacrificed: bool,
    ) -> Result<Vec<Frame>> {
        let moved = state.move_card(card, to)?;
        Ok(moved
            .events(sacrificed)
            .iter()
            .flat_map(|event| self.raise(state, event))
            .collect())
    }

    /// Put a card from anywhere into play (Toy, Ritual) or onto the
    /// set-aside zone (Spell) and collect the frames that follow: its
    /// `ON_PLAY` effects, then zone-change triggers. Costs are the caller's
    /// concern.
    pub fn play_card(
        &self,
        state: &mut GameState,
        player: PlayerId,
        card: InstanceId,
        free: bool,
    ) -> Result<Vec<Frame>> {
        let card_id = state.require_instance(card)?.card_id;
        let definition = self.tables.cards.require(card_id)?;
        let permanent = definition.category.is_permanent();

        state.record(LogEvent::CardPlayed { card, card_id, free });
        let to = if permanent { Zone::InPlay } else { Zone::SetAside };
        let moved = state.move_card(card, to)?;

        if permanent {
            if definition.category == crate::cards::CardCategory::Toy {
                state.progress.record_toy(card_id);
            }
        } else {
            let storm = state.progress.record_spell(card_id);
            debug!("{} cast with storm {storm}", definition.name);
        }

        let on_play = GameEvent::new(TriggerKind::OnPlay, player)
            .with_subject(card)
            .with_move(moved.from, moved.to);
        let mut frames = self.raise(state, &on_play);
        for event in moved.events(false) {
            // Echo effects already resolved through ON_PLAY for this move.
            let replayed = event.kind == TriggerKind::OnEnterPlayFromDiscard;
            frames.extend(self.raise_where(state, &event, |effect| {
                !(replayed && effect.echo && effect.trigger == TriggerKind::OnPlay)
            }));
        }
        if !permanent {
            let settle = Frame::new(Vec::new(), EffectContext::new(player, Some(card), None))
                .with_exit(FrameExit::SettleSpell(card));
            frames.push(settle);
        }
        Ok(frames)
    }

    // === Execution ===

    fn drive(&self, state: &mut GameState, mut stack: Vec<Frame>) -> Result<Resolution> {
        let mut steps = 0u32;

        while let Some(frame) = stack.last_mut() {
            if state.game_over {
                debug!("game over, dropping {} frame(s)", stack.len());
                stack.clear();
                break;
            }

            if !frame.started {
                frame.started = true;
                if !Self::admit(state, frame) {
                    stack.pop();
                    continue;
                }
            }

            if frame.finished() {
                if let Some(done) = stack.pop() {
                    let frames = self.finish(state, &done)?;
                    push_frames(&mut stack, frames);
                }
                continue;
            }

            steps += 1;
            if steps > self.rules.max_effect_steps {
                let reason = format!("effect resolution exceeded {} steps", self.rules.max_effect_steps);
                warn!("{reason}");
                state.record(LogEvent::SafetyTrip {
                    reason: reason.clone(),
                });
                return Err(SimError::TerminationSafetyTrip(reason));
            }

            let action = frame.actions[frame.next].clone();
            frame.next += 1;
            let ctx = frame.ctx.clone();

            let step = self.execute(state, &action, &ctx)?;
            WinLossChecker::check_wins(state, &self.tables.cards);

            match step {
                Step::Continue => {}
                Step::Push(frames) => push_frames(&mut stack, frames),
                Step::Suspend(decision, resume) => {
                    return Ok(Resolution::Pending(Box::new(PendingChoice {
                        decision,
                        resume,
                        ctx,
                        stack,
                    })));
                }
            }
        }

        Ok(Resolution::Complete)
    }

    /// Check a frame's gate and record its usage.
    fn admit(state: &mut GameState, frame: &Frame) -> bool {
        if let Some(usage) = &frame.usage {
            if !usage.available(state) {
                debug!("effect {} of {} already used", usage.effect_index, usage.card);
                return false;
            }
        }
        if !ConditionEvaluator::evaluate_all(&frame.gate, &frame.ctx.conditions(state)) {
            debug!("conditions not met for {:?}", frame.ctx.source);
            return false;
        }
        if let Some(usage) = &frame.usage {
            usage.mark(state);
        }
        true
    }

    fn finish(&self, state: &mut GameState, frame: &Frame) -> Result<Vec<Frame>> {
        match frame.on_exit {
            Some(FrameExit::SettleSpell(card)) if state.instance(card).is_some_and(|c| c.zone == Zone::SetAside) => {
                self.move_and_raise(state, card, Zone::Discard, false)
            }
            _ => Ok(Vec::new()),
        }
    }

    /// Execute one action.
    pub fn execute(&self, state: &mut GameState, action: &EffectAction, ctx: &EffectContext) -> Result<Step> {
        let kind = action.kind();
        debug!("execute {kind:?} for {}", ctx.player);

        match action {
            EffectAction::PlayerChoice { choice } => Ok(Self::offer_choice(state, choice, ctx)),

            EffectAction::ConditionalEffect {
                condition,
                then,
                otherwise,
            } => {
                let branch = if ConditionEvaluator::evaluate(condition, &ctx.conditions(state)) {
                    then
                } else {
                    otherwise
                };
                Ok(Step::frames(vec![Frame::child(branch.clone(), ctx)]))
            }

            EffectAction::RollDice { sides, outcomes } => {
                let roll = state.rng.roll_die(*sides);
                state.record(LogEvent::DiceRolled { sides: *sides, roll });
                let hit = outcomes.iter().find(|o| o.min <= roll && roll <= o.max);
                Ok(match hit {
                    Some(outcome) => Step::frames(vec![Frame::child(outcome.actions.clone(), ctx)]),
                    None => Step::Continue,
                })
            }

            _ => match self.handlers.get(&kind) {
                Some(handler) => handler(self, state, action, ctx),
                None if self.rules.strict_effects => {
                    Err(SimError::UnimplementedEffect(format!("no handler for {kind:?}")))
                }
                None => {
                    warn!("no handler for {kind:?}; skipped");
                    state.record(LogEvent::UnimplementedAction { kind });
                    Ok(Step::Continue)
                }
            },
        }
    }

    fn offer_choice(state: &mut GameState, choice: &PlayerChoiceSpec, ctx: &EffectContext) -> Step {
        let (descriptor, branches) = match choice {
            PlayerChoiceSpec::YesNo { prompt, on_yes, on_no } => (
                ChoiceDescriptor {
                    kind: ChoiceKind::YesNo,
                    prompt: prompt.clone(),
                    options: vec![
                        ChoiceOption::new("Yes", OptionTag::Yes),
                        ChoiceOption::new("No", OptionTag::No),
                    ],
                },
                Resume::Branch(vec![on_yes.clone(), on_no.clone()]),
            ),

            PlayerChoiceSpec::DiscardOrSacrificeSpirit { discard, sacrifice } => {
                let player = state.player(ctx.player);
                let mut options = Vec::new();
                let mut branches = Vec::new();
                if *discard > 0 && player.zones.zone_size(Zone::Hand) > 0 {
                    options.push(ChoiceOption::new(
                        format!("Discard {discard}"),
                        OptionTag::Discard { count: *discard },
                    ));
                    branches.push(vec![EffectAction::DiscardChosen { count: *discard }]);
                }
                if *sacrifice > 0 && player.spirits >= *sacrifice {
                    options.push(ChoiceOption::new(
                        format!("Sacrifice {sacrifice} Spirit(s)"),
                        OptionTag::SacrificeSpirit { count: *sacrifice },
                    ));
                    branches.push(vec![EffectAction::SacrificeResource {
                        resource: crate::core::Resource::Spirits,
                        count: *sacrifice,
                    }]);
                }
                (
                    ChoiceDescriptor {
                        kind: ChoiceKind::DiscardOrSacrifice,
                        prompt: "discard cards or sacrifice Spirits".to_string(),
                        options,
                    },
                    Resume::Branch(branches),
                )
            }

            PlayerChoiceSpec::Options { prompt, options } => (
                ChoiceDescriptor {
                    kind: ChoiceKind::Options,
                    prompt: prompt.clone(),
                    options: options
                        .iter()
                        .enumerate()
                        .map(|(i, branch)| ChoiceOption::new(branch.label.clone(), OptionTag::Branch(i)))
                        .collect(),
                },
                Resume::Branch(options.iter().map(|b| b.actions.clone()).collect()),
            ),

            PlayerChoiceSpec::Number { prompt, min, max, actions } => (
                ChoiceDescriptor {
                    kind: ChoiceKind::Number,
                    prompt: prompt.clone(),
                    options: (*min..=(*max).min(min.saturating_add(MAX_NUMBER_OPTIONS - 1)))
                        .map(|n| ChoiceOption::new(n.to_string(), OptionTag::Number(n)))
                        .collect(),
                },
                Resume::Repeat(actions.clone()),
            ),
        };

        if descriptor.options.is_empty() {
            state.record(LogEvent::ChoiceSkipped {
                reason: format!("no legal option for {:?}", descriptor.kind),
            });
            return Step::Continue;
        }

        state.record(LogEvent::ChoiceOffered {
            options: descriptor.options.len(),
        });
        Step::Suspend(Decision::Choice(descriptor), branches)
    }
}

fn push_frames(stack: &mut Vec<Frame>, frames: Vec<Frame>) {
    stack.extend(frames.into_iter().rev());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Resource;
    use crate::effects::{DiceOutcome, EffectAction};
    use crate::testing::{sample_state, sample_tables, toy_card};

    fn answer(engine: &EffectEngine<'_>, state: &mut GameState, resolution: Resolution, option: usize) -> Resolution {
        match resolution {
            Resolution::Pending(pending) => engine
                .resume(state, *pending, &ChoiceResponse::Option(option))
                .unwrap(),
            Resolution::Complete => panic!("expected a pending choice"),
        }
    }

    #[test]
    fn test_actions_run_in_order() {
        let tables = sample_tables();
        let rules = RulesConfig::default();
        let engine = EffectEngine::new(&tables, &rules);
        let mut state = sample_state();

        let effect = Effect::new(TriggerKind::OnPlay)
            .with_action(EffectAction::create_spirits(2))
            .with_action(EffectAction::ConvertTokens {
                from: Resource::Spirits,
                to: Resource::Memory,
                count: 1,
            });
        let done = engine.resolve(&mut state, &effect, PlayerId::SOLO, None, None).unwrap();

        assert!(done.is_complete());
        assert_eq!(state.player(PlayerId::SOLO).spirits, 1);
        assert_eq!(state.player(PlayerId::SOLO).memory, 1);
        assert_eq!(state.progress.spirits_created, 2);
    }

    #[test]
    fn test_trigger_mismatch_does_nothing() {
        let tables = sample_tables();
        let rules = RulesConfig::default();
        let engine = EffectEngine::new(&tables, &rules);
        let mut state = sample_state();

        let effect = Effect::new(TriggerKind::OnPlay).with_action(EffectAction::create_spirits(1));
        let event = GameEvent::new(TriggerKind::EndPlayerTurn, PlayerId::SOLO);
        engine.resolve(&mut state, &effect, PlayerId::SOLO, None, Some(event)).unwrap();
        assert_eq!(state.player(PlayerId::SOLO).spirits, 0);
    }

    #[test]
    fn test_conditions_gate_the_whole_list() {
        let tables = sample_tables();
        let rules = RulesConfig::default();
        let engine = EffectEngine::new(&tables, &rules);
        let mut state = sample_state();

        let effect = Effect::new(TriggerKind::OnPlay)
            .with_condition(Condition::resource_at_least(Resource::Memory, 1))
            .with_action(EffectAction::create_spirits(1));
        engine.resolve(&mut state, &effect, PlayerId::SOLO, None, None).unwrap();
        assert_eq!(state.player(PlayerId::SOLO).spirits, 0);

        state.player_mut(PlayerId::SOLO).memory = 1;
        engine.resolve(&mut state, &effect, PlayerId::SOLO, None, None).unwrap();
        assert_eq!(state.player(PlayerId::SOLO).spirits, 1);
    }

    #[test]
    fn test_conditional_effect_branches() {
        let tables = sample_tables();
        let rules = RulesConfig::default();
        let engine = EffectEngine::new(&tables, &rules);
        let mut state = sample_state();

        let branch = EffectAction::conditional(
            Condition::DeckSizeAtMost { count: 0 },
            vec![EffectAction::create_memory(1)],
            vec![EffectAction::create_spirits(1)],
        );
        engine.perform(&mut state, PlayerId::SOLO, vec![branch]).unwrap();
        assert_eq!(state.player(PlayerId::SOLO).memory, 1);
        assert_eq!(state.player(PlayerId::SOLO).spirits, 0);
    }

    #[test]
    fn test_choice_suspends_and_resumes_same_list() {
        let tables = sample_tables();
        let rules = RulesConfig::default();
        let engine = EffectEngine::new(&tables, &rules);
        let mut state = sample_state();

        let actions = vec![
            EffectAction::create_spirits(1),
            EffectAction::yes_no("more?", vec![EffectAction::create_spirits(2)], vec![]),
            EffectAction::create_memory(1),
        ];
        let resolution = engine.perform(&mut state, PlayerId::SOLO, actions).unwrap();
        let Resolution::Pending(pending) = resolution else {
            panic!("expected a pending choice");
        };
        assert!(matches!(&pending.decision, Decision::Choice(c) if c.kind == ChoiceKind::YesNo));
        assert_eq!(state.player(PlayerId::SOLO).spirits, 1);
        assert_eq!(state.player(PlayerId::SOLO).memory, 0);

        let done = engine
            .resume(&mut state, *pending, &ChoiceResponse::Option(0))
            .unwrap();
        assert!(done.is_complete());
        assert_eq!(state.player(PlayerId::SOLO).spirits, 3);
        assert_eq!(state.player(PlayerId::SOLO).memory, 1);
    }

    #[test]
    fn test_invalid_response_rejected() {
        let tables = sample_tables();
        let rules = RulesConfig::default();
        let engine = EffectEngine::new(&tables, &rules);
        let mut state = sample_state();

        let resolution = engine
            .perform(&mut state, PlayerId::SOLO, vec![EffectAction::yes_no("?", vec![], vec![])])
            .unwrap();
        let Resolution::Pending(pending) = resolution else {
            panic!("expected a pending choice");
        };
        let err = engine
            .resume(&mut state, *pending, &ChoiceResponse::Option(5))
            .unwrap_err();
        assert!(matches!(err, SimError::RuleViolation(_)));
    }

    #[test]
    fn test_discard_or_sacrifice_offers_only_payable_options() {
        let tables = sample_tables();
        let rules = RulesConfig::default();
        let engine = EffectEngine::new(&tables, &rules);
        let mut state = sample_state();
        state.create_instance(toy_card(1), PlayerId::SOLO, Zone::Hand).unwrap();

        let resolution = engine
            .perform(&mut state, PlayerId::SOLO, vec![EffectAction::discard_or_sacrifice(1, 1)])
            .unwrap();
        let Resolution::Pending(pending) = resolution else {
            panic!("expected a pending choice");
        };
        let Decision::Choice(choice) = &pending.decision else {
            panic!("expected an option choice");
        };
        assert_eq!(choice.options.len(), 1);
        assert_eq!(choice.options[0].tag, OptionTag::Discard { count: 1 });

        let done = answer(&engine, &mut state, Resolution::Pending(pending), 0);
        assert!(done.is_complete());
        assert_eq!(state.zone_size(PlayerId::SOLO, Zone::Hand), 0);
        assert_eq!(state.zone_size(PlayerId::SOLO, Zone::Discard), 1);
    }

    #[test]
    fn test_choice_with_no_options_is_skipped() {
        let tables = sample_tables();
        let rules = RulesConfig::default();
        let engine = EffectEngine::new(&tables, &rules);
        let mut state = sample_state();

        let done = engine
            .perform(&mut state, PlayerId::SOLO, vec![EffectAction::discard_or_sacrifice(1, 1)])
            .unwrap();
        assert!(done.is_complete());
        assert!(state
            .log
            .iter()
            .any(|e| matches!(e.event, LogEvent::ChoiceSkipped { .. })));
    }

    #[test]
    fn test_number_choice_repeats() {
        let tables = sample_tables();
        let rules = RulesConfig::default();
        let engine = EffectEngine::new(&tables, &rules);
        let mut state = sample_state();

        let choice = EffectAction::PlayerChoice {
            choice: PlayerChoiceSpec::Number {
                prompt: "how many".into(),
                min: 0,
                max: 3,
                actions: vec![EffectAction::create_memory(1)],
            },
        };
        let pending = engine.perform(&mut state, PlayerId::SOLO, vec![choice]).unwrap();
        answer(&engine, &mut state, pending, 2);
        assert_eq!(state.player(PlayerId::SOLO).memory, 2);
    }

    #[test]
    fn test_number_choice_range_is_capped() {
        let tables = sample_tables();
        let rules = RulesConfig::default();
        let engine = EffectEngine::new(&tables, &rules);
        let mut state = sample_state();

        let choice = EffectAction::PlayerChoice {
            choice: PlayerChoiceSpec::Number {
                prompt: "how many".into(),
                min: 5,
                max: u32::MAX,
                actions: vec![EffectAction::create_memory(1)],
            },
        };
        let Resolution::Pending(pending) = engine.perform(&mut state, PlayerId::SOLO, vec![choice]).unwrap() else {
            panic!("number choice should suspend");
        };
        let Decision::Choice(descriptor) = &pending.decision else {
            panic!("expected a choice descriptor");
        };
        assert_eq!(descriptor.options.len(), MAX_NUMBER_OPTIONS as usize);
        assert_eq!(descriptor.options[0].tag, OptionTag::Number(5));
    }

    #[test]
    fn test_unhandled_kind_is_logged_noop() {
        let tables = sample_tables();
        let rules = RulesConfig::default();
        let mut engine = EffectEngine::new(&tables, &rules);
        engine.unregister(ActionKind::AddMana);
        let mut state = sample_state();

        let done = engine
            .perform(
                &mut state,
                PlayerId::SOLO,
                vec![EffectAction::Unrecognized, EffectAction::add_mana(2), EffectAction::create_spirits(1)],
            )
            .unwrap();
        assert!(done.is_complete());
        assert_eq!(state.player(PlayerId::SOLO).mana, 0);
        assert_eq!(state.player(PlayerId::SOLO).spirits, 1);
        let skipped = state
            .log
            .iter()
            .filter(|e| matches!(e.event, LogEvent::UnimplementedAction { .. }))
            .count();
        assert_eq!(skipped, 2);
    }

    #[test]
    fn test_strict_mode_rejects_unhandled_kind() {
        let tables = sample_tables();
        let rules = RulesConfig::default().with_strict_effects(true);
        let engine = EffectEngine::new(&tables, &rules);
        let mut state = sample_state();

        let err = engine
            .perform(
                &mut state,
                PlayerId::SOLO,
                vec![EffectAction::create_spirits(1), EffectAction::Unrecognized],
            )
            .unwrap_err();
        assert!(matches!(err, SimError::UnimplementedEffect(_)));
        assert!(!err.is_recoverable());
        assert_eq!(state.player(PlayerId::SOLO).spirits, 1);
    }

    #[test]
    fn test_dice_roll_picks_outcome() {
        let tables = sample_tables();
        let rules = RulesConfig::default();
        let engine = EffectEngine::new(&tables, &rules);
        let mut state = sample_state();

        let roll = EffectAction::RollDice {
            sides: 6,
            outcomes: vec![
                DiceOutcome { min: 1, max: 3, actions: vec![EffectAction::create_spirits(1)] },
                DiceOutcome { min: 4, max: 6, actions: vec![EffectAction::create_memory(1)] },
            ],
        };
        engine.perform(&mut state, PlayerId::SOLO, vec![roll]).unwrap();
        let player = state.player(PlayerId::SOLO);
        assert_eq!(player.spirits + player.memory, 1);
        assert!(state.log.iter().any(|e| matches!(e.event, LogEvent::DiceRolled { sides: 6, .. })));
    }

    #[test]
    fn test_game_over_skips_remaining_actions() {
        let tables = sample_tables();
        let rules = RulesConfig::default();
        let engine = EffectEngine::new(&tables, &rules);
        let mut state = sample_state();
        // sample objective: 3 distinct toys and 3 spirits
        for n in 1..=3 {
            state.progress.record_toy(toy_card(n));
        }

        engine
            .perform(
                &mut state,
                PlayerId::SOLO,
                vec![EffectAction::create_spirits(3), EffectAction::create_memory(5)],
            )
            .unwrap();
        assert!(state.game_over);
        assert_eq!(state.player(PlayerId::SOLO).memory, 0);
    }

    #[test]
    fn test_step_limit_trips() {
        let tables = sample_tables();
        let rules = RulesConfig::default().with_max_effect_steps(5);
        let engine = EffectEngine::new(&tables, &rules);
        let mut state = sample_state();

        let err = engine
            .perform(&mut state, PlayerId::SOLO, vec![EffectAction::add_mana(1); 10])
            .unwrap_err();
        assert!(matches!(err, SimError::TerminationSafetyTrip(_)));
    }
}
