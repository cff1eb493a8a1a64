//! Per-frame driver
//!
//! One call to `frame` per display refresh. Actors update (and draw) in list
//! order; the neutron pool relies on running after the rod so collisions see
//! the rod's position for this frame.

use rand::Rng;

use super::collision::{self, Fate};
use super::entity::{Behavior, Entity};
use super::fuel::{FuelStatus, Side};
use super::neutron::PoolStep;
use super::state::{Actor, GamePhase, SimError, SimulationState, SoundCue};
use crate::consts::*;
use crate::platform::{FrameInput, Surface};
use crate::renderer::Rgba;

/// Advance the game by one frame, drawing onto `surface`.
///
/// The first failing actor aborts the rest of the frame and the frame counter
/// is left untouched. If an actor requests a phase change, the new phase is
/// entered immediately and the remaining actors of the old list are skipped;
/// the new phase's first frame is the next call (counter 0).
pub fn frame(state: &mut SimulationState, input: &FrameInput, surface: &mut dyn Surface) -> Result<(), SimError> {
    let mut actors = std::mem::take(&mut state.actors);
    let result = run_actors(state, &mut actors, input, surface);
    state.actors = actors;
    result?;

    if let Some(next) = state.pending.take() {
        state.enter(next);
        return Ok(());
    }

    if state.phase == GamePhase::Playing && state.options.show_status {
        surface.debug_print(&status_line(state))?;
    }
    state.frame = state.frame.wrapping_add(1);
    Ok(())
}

fn run_actors(
    state: &mut SimulationState,
    actors: &mut [Actor],
    input: &FrameInput,
    surface: &mut dyn Surface,
) -> Result<(), SimError> {
    for actor in actors.iter_mut() {
        update_actor(state, actor, input, surface)?;
        if state.pending.is_some() {
            break;
        }
    }
    Ok(())
}

fn update_actor(
    state: &mut SimulationState,
    actor: &mut Actor,
    input: &FrameInput,
    surface: &mut dyn Surface,
) -> Result<(), SimError> {
    match actor {
        Actor::Scenery(entity) => {
            behave(state, entity, input, surface)?;
            if state.pending.is_none() {
                draw(state, entity, surface)?;
            }
        }
        Actor::ControlRod => {
            state.rod.update(input);
            state.rod.entity.draw(surface, state.extents.rod)?;
        }
        Actor::Fuel(side) => {
            let side = *side;
            match state.fuel_mut(side).update() {
                FuelStatus::Critical => {
                    log::info!("{side:?} fuel rod critical");
                    state.request(GamePhase::Meltdown);
                }
                FuelStatus::Stable => state.fuel(side).entity.draw(surface, state.extents.fuel)?,
            }
        }
        Actor::Neutrons => update_neutrons(state, surface)?,
    }
    Ok(())
}

fn draw(state: &SimulationState, entity: &Entity, surface: &mut dyn Surface) -> Result<(), SimError> {
    if let Some(image) = entity.image {
        entity.draw(surface, state.extents.of(image))?;
    }
    Ok(())
}

/// Behavior switch for scenery entities
fn behave(
    state: &mut SimulationState,
    entity: &mut Entity,
    input: &FrameInput,
    surface: &mut dyn Surface,
) -> Result<(), SimError> {
    match entity.behavior {
        Behavior::Static => {}
        Behavior::NeutronMoving(_) | Behavior::RodFalling => entity.advance(),
        Behavior::IntroScroll => {
            if input.start {
                state.request(GamePhase::Playing);
                return Ok(());
            }
            if state.frame % INTRO_SCROLL_INTERVAL == 0 {
                entity.pos.y -= 1.0;
            }
            if entity.pos.y < -HEIGHT {
                entity.pos.y = HEIGHT * 2.0;
            }
            surface.debug_print(INTRO_TEXT)?;
        }
        Behavior::MeltdownFlicker => {
            let every_frame = !state.options.reduced_motion;
            if every_frame || state.frame % REDUCED_FLICKER_INTERVAL == 0 {
                let [r, g, b]: [u8; 3] = state.rng.random();
                state.flicker_color = Rgba::opaque(r, g, b);
            }
            surface.fill(state.flicker_color)?;
        }
        Behavior::MeltdownMessage => {
            if state.frame == MELTDOWN_RETRY_FRAMES {
                state.meltdown_text.push_str(RETRY_TEXT);
            }
            if state.frame > MELTDOWN_RETRY_FRAMES && input.pointer_held {
                state.request(GamePhase::Intro);
                return Ok(());
            }
            surface.debug_print(&state.meltdown_text)?;
        }
    }
    Ok(())
}

/// Spawn, move, collide and draw every neutron slot
fn update_neutrons(state: &mut SimulationState, surface: &mut dyn Surface) -> Result<(), SimError> {
    if state.pool.is_empty() {
        return Err(SimError::EmptyPool);
    }
    let frame = state.frame;
    if state.pool.begin_frame(frame) == PoolStep::Seeded {
        return Ok(());
    }

    let neutron_size = state.extents.neutron;
    let rod_box = state.rod.bounds(state.extents.rod);

    for index in 0..state.pool.len() {
        let spawned = state.pool.try_spawn(index, frame);
        let Some(Some(neutron)) = state.pool.slot_mut(index) else {
            continue;
        };
        neutron.entity.advance();

        match collision::resolve(&neutron.entity, neutron_size, &rod_box) {
            Fate::Caught => {
                log::debug!("Neutron in slot {index} absorbed by control rod");
                state.pool.clear(index);
                state.caught += 1;
                state.cue(SoundCue::GoodHit);
            }
            Fate::Escaped(side) => {
                state.pool.clear(index);
                state.fuel_mut(side).record_hit();
                state.cue(SoundCue::BadHit);
            }
            Fate::Active => {
                if spawned {
                    log::trace!("Neutron {index} entering at {:?}", neutron.pos());
                }
                neutron.entity.draw(surface, neutron_size)?;
            }
        }
    }
    Ok(())
}

fn status_line(state: &SimulationState) -> String {
    format!(
        "\n\n\n\n\n\n\n{:?}  frame {}  slots {}  hits L{} R{}  caught {}",
        state.phase,
        state.frame,
        state.pool.len(),
        state.fuel(Side::Left).hits,
        state.fuel(Side::Right).hits,
        state.caught
    )
}
