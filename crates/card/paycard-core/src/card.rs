//! Card facade: mounts the card into a container and wires the form to it.
//!
//! One `Card` per widget instance owns everything mutable (network, flip
//! state, bindings). Hosts forward input events to [`Card::handle`].

use crate::binding::{BindConfig, Field, FieldBinding, JoinRule};
use crate::error::MountError;
use crate::flip::FlipState;
use crate::formatting::Formatter;
use crate::ids::ElementId;
use crate::options::CardOptions;
use crate::pipeline::{normalize_expiry, Filter, ValidityKind};
use crate::surface::{EventKind, InputEvent, Surface};
use crate::template::CardMarkup;
use crate::tracker::CardTypeTracker;
use paycard_payment::Network;

/// Set on the container once a card is mounted into it.
pub const INITIALIZED_ATTR: &str = "data-jp-card-initialized";

/// The form and the element the card is rendered into.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct MountTargets {
    pub form: Option<ElementId>,
    pub container: Option<ElementId>,
}

#[derive(Debug)]
pub struct Card {
    options: CardOptions,
    container: ElementId,
    card: ElementId,
    bindings: Vec<FieldBinding>,
    formatters: Vec<(ElementId, Formatter)>,
    number_inputs: Vec<ElementId>,
    cvc_inputs: Vec<ElementId>,
    tracker: CardTypeTracker,
    flip: FlipState,
}

impl Card {
    /// Render the card into the container and bind the form to it.
    ///
    /// Every required lookup happens before the page is modified, except the
    /// card element itself, which can only be found once the markup exists.
    pub fn mount(
        surface: &mut dyn Surface,
        targets: MountTargets,
        options: CardOptions,
    ) -> Result<Card, MountError> {
        let result = Self::try_mount(surface, targets, options);
        if let Err(err) = &result {
            if err.is_fatal() {
                log::error!("card mount failed ({}): {err}", err.category());
            } else {
                log::debug!("card mount skipped: {err}");
            }
        }
        result
    }

    fn try_mount(
        surface: &mut dyn Surface,
        targets: MountTargets,
        options: CardOptions,
    ) -> Result<Card, MountError> {
        let form = targets.form.ok_or(MountError::MissingForm)?;
        let container = targets.container.ok_or(MountError::MissingContainer)?;
        if surface.attribute(container, INITIALIZED_ATTR).is_some() {
            return Err(MountError::AlreadyMounted);
        }

        let mut inputs: Vec<(Field, Vec<ElementId>)> = Vec::with_capacity(Field::ALL.len());
        for field in Field::ALL {
            let selector = options.input_selector(field);
            let found = surface.query_all(form, selector);
            if found.is_empty() {
                return Err(MountError::MissingInput {
                    field,
                    selector: selector.to_string(),
                });
            }
            inputs.push((field, found));
        }

        let markup = CardMarkup::new(&options);
        surface.set_attribute(container, INITIALIZED_ATTR, "true");
        surface.render(container, &markup);

        let card_selector = &options.card_selectors.card;
        let Some(card) = surface.query_first(container, card_selector) else {
            surface.remove_rendered(container, &markup);
            surface.remove_attribute(container, INITIALIZED_ATTR);
            return Err(MountError::MissingCard {
                selector: card_selector.clone(),
            });
        };

        let mut this = Card {
            container,
            card,
            bindings: Vec::with_capacity(inputs.len()),
            formatters: Vec::new(),
            number_inputs: Vec::new(),
            cvc_inputs: Vec::new(),
            tracker: CardTypeTracker::new(),
            flip: FlipState::default(),
            options,
        };

        for (field, field_inputs) in inputs {
            let outputs = this.resolve_displays(surface, field);
            if this.options.formatting {
                this.add_formatters(field, &field_inputs);
            }
            match field {
                Field::Number => this.number_inputs = field_inputs.clone(),
                Field::Cvc => this.cvc_inputs = field_inputs.clone(),
                Field::Expiry | Field::Name => {}
            }
            let config = this.bind_config(field);
            let binding = FieldBinding::bind(
                surface,
                field,
                field_inputs,
                outputs,
                config,
                this.tracker.network(),
                &this.options.classes,
            );
            this.bindings.push(binding);
        }

        this.replay_initial_values(surface);
        Ok(this)
    }

    fn resolve_displays(&self, surface: &dyn Surface, field: Field) -> Vec<ElementId> {
        let mut outputs = Vec::new();
        for (key, selector) in self.options.card_selectors.displays_for(field) {
            match surface.query_first(self.container, selector) {
                Some(el) => outputs.push(el),
                None if self.options.debug => {
                    log::warn!("no element found for selector {selector} ({key})");
                }
                None => {}
            }
        }
        outputs
    }

    fn add_formatters(&mut self, field: Field, inputs: &[ElementId]) {
        let formatters = match field {
            Field::Number => vec![Formatter::CardNumber; inputs.len()],
            Field::Cvc => vec![Formatter::Cvc; inputs.len()],
            Field::Expiry => Formatter::for_expiry_inputs(inputs.len()),
            Field::Name => return,
        };
        self.formatters
            .extend(inputs.iter().copied().zip(formatters));
    }

    fn bind_config(&self, field: Field) -> BindConfig {
        match field {
            Field::Number => {
                let mut filters = vec![Filter::validity(ValidityKind::Number)];
                if let Some(mask) = self.options.masks.card_number {
                    filters.push(Filter::Mask(mask));
                }
                BindConfig {
                    filters,
                    ..BindConfig::default()
                }
            }
            Field::Expiry => BindConfig {
                filters: vec![
                    Filter::normalize(normalize_expiry),
                    Filter::validity(ValidityKind::Expiry),
                ],
                join: JoinRule::expiry(),
                ..BindConfig::default()
            },
            Field::Cvc => BindConfig {
                filters: vec![Filter::validity(ValidityKind::Cvc)],
                ..BindConfig::default()
            },
            Field::Name => BindConfig {
                filters: vec![Filter::validity(ValidityKind::HolderName)],
                join: JoinRule::Static(" ".into()),
                ..BindConfig::default()
            },
        }
    }

    /// Pre-filled fields go through the same paste + change sequence a user would
    /// produce, once, synchronously.
    fn replay_initial_values(&mut self, surface: &mut dyn Surface) {
        let firsts: Vec<ElementId> = self
            .bindings
            .iter()
            .filter_map(|b| b.inputs().first().copied())
            .collect();
        for el in firsts {
            if surface.value(el).is_empty() {
                continue;
            }
            self.handle(surface, InputEvent::new(el, EventKind::Paste));
            self.handle(surface, InputEvent::new(el, EventKind::Input));
        }
    }

    /// Route one input event. Returns `false` when no part of the card listens to the target.
    pub fn handle(&mut self, surface: &mut dyn Surface, event: InputEvent) -> bool {
        let InputEvent { target, kind } = event;
        let mut handled = false;

        if matches!(kind, EventKind::Input | EventKind::Paste) {
            if let Some(&(_, formatter)) = self.formatters.iter().find(|(el, _)| *el == target) {
                let raw = surface.value(target);
                let formatted = formatter.apply(&raw);
                if formatted != raw {
                    surface.set_value(target, &formatted);
                }
            }
        }

        let network = self.tracker.network();
        for binding in self.bindings.iter().filter(|b| b.listens_to(target)) {
            binding.handle(surface, kind, network, &self.options.classes);
            handled = true;
        }

        if kind == EventKind::Input && self.number_inputs.contains(&target) {
            let raw = surface.value(target);
            self.tracker.update(surface, self.card, &raw);
        }

        if self.cvc_inputs.contains(&target) {
            match kind {
                EventKind::Focus => self.flip.flip(surface, self.card),
                EventKind::Blur => self.flip.unflip(surface, self.card),
                EventKind::Input | EventKind::Paste => {}
            }
        }

        handled
    }

    /// Every element the host should forward events from.
    pub fn input_elements(&self) -> Vec<ElementId> {
        self.bindings
            .iter()
            .flat_map(|b| b.inputs().iter().copied())
            .collect()
    }

    pub fn network(&self) -> Network {
        self.tracker.network()
    }

    pub fn is_flipped(&self) -> bool {
        self.flip.is_flipped()
    }

    pub fn card_element(&self) -> ElementId {
        self.card
    }

    pub fn container(&self) -> ElementId {
        self.container
    }

    pub fn options(&self) -> &CardOptions {
        &self.options
    }

    pub fn bindings(&self) -> &[FieldBinding] {
        &self.bindings
    }

    pub fn binding(&self, field: Field) -> Option<&FieldBinding> {
        self.bindings.iter().find(|b| b.field() == field)
    }
}
