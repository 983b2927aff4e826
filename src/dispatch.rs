//! Combat order dispatcher.
//!
//! Runs one species' order file against the shared battle registry. The
//! dispatcher first looks for the section start (`START COMBAT`, or
//! `START STRIKES` in the strike phase), skipping over embedded message
//! blocks, then routes each command to the slot builder until `END` or the
//! end of the file. Bad orders are reported in the species' transcript and
//! skipped; only capacity violations stop the run.

use tracing::{debug, error, warn};

use crate::config::CompileConfig;
use crate::error::{CompileError, OrderError, OrderFault};
use crate::galaxy::{Galaxy, SpeciesId};
use crate::protocol::{abbreviates, Keyword, OrderLine};
use crate::resolver::resolve_species;
use crate::roster::slot;
use crate::roster::{BattleRegistry, EnemyRef, Intent, SlotHandle};
use crate::transcript::Transcript;

/// Parsing state for one species' order file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub species: SpeciesId,
    pub strike: bool,
    pub default_summary: bool,
    /// Slot opened by the last accepted BATTLE order.
    context: Option<SlotHandle>,
}

impl Session {
    pub fn new(species: SpeciesId, config: &CompileConfig) -> Self {
        Session {
            species,
            strike: config.strike_phase,
            default_summary: config.default_summary,
            context: None,
        }
    }

    pub fn current_slot(&self) -> Option<SlotHandle> {
        self.context
    }
}

/// Dispatcher states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    SeekingStart,
    InOrders,
    Done,
}

/// Scanner states while looking for the section start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scan {
    Seek,
    /// Inside a message block opened on the given line.
    Skip { opened: usize },
}

/// Counts of what happened to a species' orders.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchStats {
    pub started: bool,
    pub accepted: usize,
    pub rejected: usize,
}

/// Returns the index of the first line after `START <section>`.
///
/// Message blocks (`MESSAGE` … `ZZZ`) are skipped whole, so a start marker
/// quoted inside a message does not count. A block with no terminator ends
/// the scan with a warning.
pub fn seek_start(
    lines: &[OrderLine],
    section: &str,
    species: SpeciesId,
    transcript: &mut dyn Transcript,
) -> Option<usize> {
    let mut scan = Scan::Seek;
    for (i, line) in lines.iter().enumerate() {
        scan = match scan {
            Scan::Seek if line.is(Keyword::Message) => Scan::Skip { opened: line.line },
            Scan::Seek => {
                let opens = line.is(Keyword::Start)
                    && line
                        .operands()
                        .word()
                        .is_some_and(|w| abbreviates(w, section));
                if opens {
                    return Some(i + 1);
                }
                Scan::Seek
            }
            Scan::Skip { .. } if line.is(Keyword::Zzz) => Scan::Seek,
            skip @ Scan::Skip { .. } => skip,
        };
    }
    if let Scan::Skip { opened } = scan {
        warn!(%species, line = opened, "message block never terminated");
        transcript.line(
            species,
            &format!("WARNING: message starting on line {} has no ZZZ terminator", opened),
        );
    }
    None
}

/// Applies order files to the turn's battle registry.
pub struct Dispatcher<'a> {
    registry: &'a mut BattleRegistry,
    galaxy: &'a mut Galaxy,
    config: &'a CompileConfig,
    transcript: &'a mut dyn Transcript,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        registry: &'a mut BattleRegistry,
        galaxy: &'a mut Galaxy,
        config: &'a CompileConfig,
        transcript: &'a mut dyn Transcript,
    ) -> Self {
        Dispatcher {
            registry,
            galaxy,
            config,
            transcript,
        }
    }

    /// Runs one species' orders to completion.
    pub fn run(
        &mut self,
        session: &mut Session,
        lines: &[OrderLine],
    ) -> Result<DispatchStats, CompileError> {
        let mut stats = DispatchStats::default();
        let mut state = DispatchState::SeekingStart;
        let mut cursor = 0;

        loop {
            state = match state {
                DispatchState::SeekingStart => {
                    match seek_start(lines, self.config.section(), session.species, self.transcript) {
                        Some(next) => {
                            stats.started = true;
                            cursor = next;
                            DispatchState::InOrders
                        }
                        None => DispatchState::Done,
                    }
                }
                DispatchState::InOrders => match lines.get(cursor) {
                    None => DispatchState::Done,
                    Some(line) if line.is(Keyword::End) => DispatchState::Done,
                    Some(line) => {
                        cursor += 1;
                        self.apply(session, line, &mut stats)?;
                        DispatchState::InOrders
                    }
                },
                DispatchState::Done => break,
            };
        }

        debug!(
            species = %session.species,
            started = stats.started,
            accepted = stats.accepted,
            rejected = stats.rejected,
            "orders dispatched"
        );
        Ok(stats)
    }

    /// Executes one line and reports the outcome to the transcript.
    fn apply(
        &mut self,
        session: &mut Session,
        line: &OrderLine,
        stats: &mut DispatchStats,
    ) -> Result<(), CompileError> {
        match self.execute(session, line) {
            Ok(()) => {
                stats.accepted += 1;
                self.transcript.line(session.species, &line.text);
                Ok(())
            }
            Err(OrderFault::Rejected(reason)) => {
                stats.rejected += 1;
                debug!(species = %session.species, line = line.line, %reason, "order ignored");
                self.transcript.line(
                    session.species,
                    &format!("!!! Order ignored (line {}): {}", line.line, line.text),
                );
                self.transcript
                    .line(session.species, &format!("!!!   {}", reason));
                Ok(())
            }
            Err(OrderFault::Fatal(e)) => {
                error!(species = %session.species, line = line.line, "{}", e);
                Err(e)
            }
        }
    }

    fn execute(&mut self, session: &mut Session, line: &OrderLine) -> Result<(), OrderFault> {
        let mut ops = line.operands();
        match line.keyword {
            Some(Keyword::Battle) => return self.battle(session, line),
            Some(Keyword::Summary) => {
                slot::set_summary(self.registry.slot_mut(in_battle(session)?))
            }
            Some(Keyword::Withdraw) => {
                slot::set_withdraw(self.registry.slot_mut(in_battle(session)?), &mut ops)?
            }
            Some(Keyword::Haven) => {
                slot::set_haven(self.registry.slot_mut(in_battle(session)?), &mut ops)?
            }
            Some(Keyword::Engage) => {
                slot::add_engage(
                    self.registry.slot_mut(in_battle(session)?),
                    &mut ops,
                    self.config.max_engage_code(),
                    self.config.max_engage_options,
                )?;
            }
            Some(Keyword::Target) => {
                slot::set_target(self.registry.slot_mut(in_battle(session)?), &mut ops)?
            }
            Some(Keyword::Hide) => {
                in_battle(session)?;
                let ship = slot::hide_ship(self.galaxy, session.species, &mut ops)?;
                debug!(species = %session.species, %ship, "ship hidden");
            }
            Some(Keyword::Attack) => self.declare(session, line, Intent::Attack)?,
            Some(Keyword::Hijack) => self.declare(session, line, Intent::Hijack)?,
            _ => return Err(OrderError::UnknownCommand(line.word.clone()).into()),
        }
        Ok(())
    }

    /// `BATTLE <x> <y> <z>`: opens (or reopens) this species' slot in the
    /// battle at that sector.
    fn battle(&mut self, session: &mut Session, line: &OrderLine) -> Result<(), OrderFault> {
        session.context = None;
        let sector = slot::read_sector(&mut line.operands())?;
        let handle =
            self.registry
                .join(self.galaxy, session.species, sector, session.default_summary)?;
        session.context = Some(handle);
        Ok(())
    }

    /// `ATTACK` / `HIJACK`, either `0` for every standing enemy or a species
    /// reference.
    fn declare(
        &mut self,
        session: &Session,
        line: &OrderLine,
        intent: Intent,
    ) -> Result<(), OrderFault> {
        let handle = in_battle(session)?;
        let sector = self.registry.sector_of(handle);
        let max = self.config.max_enemies;
        let mut ops = line.operands();

        if ops.peek_int() == Some(0) {
            let added = slot::declare_standing_enemies(
                self.registry.slot_mut(handle),
                self.galaxy,
                sector,
                intent,
                max,
            )?;
            debug!(species = %session.species, ?intent, count = added.len(), "standing enemies declared");
            return Ok(());
        }

        let reference = ops.text("species name")?;
        let species = resolve_species(self.galaxy, reference)
            .ok_or_else(|| OrderError::UnknownSpecies(reference.to_string()))?;
        let enemy = EnemyRef { species, intent };
        let listed =
            slot::declare_named_enemy(self.registry.slot_mut(handle), self.galaxy, sector, enemy, max)?;
        if !listed {
            debug!(
                species = %session.species,
                enemy = %species,
                %sector,
                "named enemy not present; roster unchanged"
            );
        }
        Ok(())
    }
}

/// Returns the slot opened by the last accepted BATTLE order.
fn in_battle(session: &Session) -> Result<SlotHandle, OrderError> {
    session.context.ok_or(OrderError::NoBattle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::galaxy::{Presence, Sector, Ship, ShipStatus, Species};
    use crate::protocol::tokenize;
    use crate::roster::{EngageOption, Stance, StrategicTarget};
    use crate::transcript::MemoryTranscript;

    const HERE: Sector = Sector::new(10, 10, 10);

    fn galaxy() -> Galaxy {
        let mut g = Galaxy::new();
        for (id, name) in [(1, "Humans"), (2, "Zorgons"), (3, "Klingons")] {
            g.species.insert(Species::new(SpeciesId(id), name));
            g.presences.push(Presence {
                species: SpeciesId(id),
                sector: HERE,
                planet: None,
            });
        }
        g
    }

    fn run(
        g: &mut Galaxy,
        reg: &mut BattleRegistry,
        config: &CompileConfig,
        species: u16,
        text: &str,
    ) -> (Result<DispatchStats, CompileError>, MemoryTranscript) {
        let mut transcript = MemoryTranscript::new();
        let mut session = Session::new(SpeciesId(species), config);
        let lines = tokenize(text);
        let result = Dispatcher::new(reg, g, config, &mut transcript).run(&mut session, &lines);
        (result, transcript)
    }

    #[test]
    fn battle_then_engage() {
        let mut g = galaxy();
        let mut reg = BattleRegistry::default();
        let config = CompileConfig::default();
        let (res, _) = run(&mut g, &mut reg, &config, 3, "START COMBAT\nBATTLE 10 10 10\nENGAGE 2 5\nEND\n");
        let stats = res.unwrap();
        assert_eq!(stats.accepted, 2);
        assert_eq!(stats.rejected, 0);

        let record = &reg.battles()[0];
        assert_eq!(record.sector, HERE);
        assert_eq!(record.participants(), vec![SpeciesId(3)]);
        assert_eq!(
            record.slots[0].engage,
            vec![
                EngageOption::hold(),
                EngageOption { stance: Stance::PlanetDefense, planet: Some(5) },
            ]
        );
    }

    #[test]
    fn orders_before_start_are_ignored() {
        let mut g = galaxy();
        let mut reg = BattleRegistry::default();
        let config = CompileConfig::default();
        let (res, _) = run(&mut g, &mut reg, &config, 1, "BATTLE 10 10 10\nSTART PRE-DEPARTURE\nEND\n");
        assert!(!res.unwrap().started);
        assert!(reg.is_empty());
    }

    #[test]
    fn message_block_hides_start_marker() {
        let mut g = galaxy();
        let mut reg = BattleRegistry::default();
        let config = CompileConfig::default();
        let text = "MESSAGE SP Zorgons\nSTART COMBAT\nBATTLE 10 10 10\nZZZ\nSTART COMBAT\nTARGET 2\nBATTLE 10 10 10\nTARGET 2\n";
        let (res, t) = run(&mut g, &mut reg, &config, 1, text);
        let stats = res.unwrap();
        assert_eq!(stats.accepted, 2);
        assert_eq!(stats.rejected, 1);
        assert_eq!(reg.battles()[0].slots[0].target, Some(StrategicTarget::Transports));
        assert!(t.lines_for(SpeciesId(1))[0].contains("line 6"));
    }

    #[test]
    fn unterminated_message_stops_scan() {
        let mut g = galaxy();
        let mut reg = BattleRegistry::default();
        let config = CompileConfig::default();
        let (res, t) = run(&mut g, &mut reg, &config, 1, "MESSAGE SP Zorgons\nhello\nSTART COMBAT\nBATTLE 10 10 10\n");
        assert!(!res.unwrap().started);
        assert!(reg.is_empty());
        assert!(t.lines_for(SpeciesId(1))[0].starts_with("WARNING"));
    }

    #[test]
    fn commands_without_battle_are_rejected() {
        let mut g = galaxy();
        let mut reg = BattleRegistry::default();
        let config = CompileConfig::default();
        let (res, t) = run(&mut g, &mut reg, &config, 1, "START COMBAT\nSUMMARY\nENGAGE 1\nJUMP 1 2 3\nEND\n");
        let stats = res.unwrap();
        assert_eq!(stats.rejected, 3);
        let lines = t.lines_for(SpeciesId(1));
        assert_eq!(lines[1], "!!!   no BATTLE order is in effect");
        assert_eq!(lines[5], "!!!   unknown command 'JUMP'");
    }

    #[test]
    fn session_tracks_current_slot() {
        let mut g = galaxy();
        let mut reg = BattleRegistry::default();
        let config = CompileConfig::default();
        let mut t = MemoryTranscript::new();
        let mut session = Session::new(SpeciesId(2), &config);
        assert_eq!(session.current_slot(), None);

        let lines = tokenize("START COMBAT\nBATTLE 10 10 10\n");
        Dispatcher::new(&mut reg, &mut g, &config, &mut t).run(&mut session, &lines).unwrap();
        let handle = session.current_slot().unwrap();
        assert_eq!(reg.slot(handle).species, SpeciesId(2));

        let lines = tokenize("START COMBAT\nBATTLE 1 1 1\n");
        Dispatcher::new(&mut reg, &mut g, &config, &mut t).run(&mut session, &lines).unwrap();
        assert_eq!(session.current_slot(), None);
    }

    #[test]
    fn rejected_battle_clears_context() {
        let mut g = galaxy();
        let mut reg = BattleRegistry::default();
        let config = CompileConfig::default();
        let (res, _) = run(&mut g, &mut reg, &config, 1, "START COMBAT\nBATTLE 10 10 10\nBATTLE 1 1 1\nSUMMARY\nEND\n");
        assert_eq!(res.unwrap().rejected, 2);
        assert!(!reg.battles()[0].slots[0].summary_only);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn strike_phase_uses_its_own_section_and_range() {
        let mut g = galaxy();
        let mut reg = BattleRegistry::default();
        let config = CompileConfig {
            strike_phase: true,
            ..CompileConfig::default()
        };
        let text = "START COMBAT\nBATTLE 10 10 10\nEND\nSTART STRIKES\nBATTLE 10 10 10\nENGAGE 5 1\nENGAGE 4 1\n";
        let (res, _) = run(&mut g, &mut reg, &config, 2, text);
        let stats = res.unwrap();
        assert_eq!((stats.accepted, stats.rejected), (2, 1));
        assert_eq!(reg.battles()[0].slots[0].engage.len(), 2);
    }

    #[test]
    fn attack_by_name_and_hijack_absent_enemy() {
        let mut g = galaxy();
        g.species.insert(Species::new(SpeciesId(4), "Romulans"));
        let mut reg = BattleRegistry::default();
        let config = CompileConfig::default();
        let text = "START COMBAT\nBATTLE 10 10 10\nATTACK SP Zorgon\nHIJACK Romulans\nATTACK Vulcans\nEND\n";
        let (res, t) = run(&mut g, &mut reg, &config, 1, text);
        let stats = res.unwrap();
        assert_eq!((stats.accepted, stats.rejected), (3, 1));

        let slot = &reg.battles()[0].slots[0];
        assert_eq!(
            slot.enemies,
            vec![EnemyRef { species: SpeciesId(2), intent: Intent::Attack }]
        );
        assert!(slot.hijacker);
        // The order against an absent species is still echoed as issued.
        assert!(t.lines_for(SpeciesId(1)).iter().any(|l| l == "HIJACK Romulans"));
    }

    #[test]
    fn attack_zero_overflow_aborts() {
        let mut g = galaxy();
        if let Some(me) = g.species.get_mut(SpeciesId(1)) {
            me.enemies.extend([SpeciesId(2), SpeciesId(3)]);
        }
        let mut reg = BattleRegistry::default();
        let config = CompileConfig {
            max_enemies: 1,
            ..CompileConfig::default()
        };
        let (res, _) = run(&mut g, &mut reg, &config, 1, "START COMBAT\nBATTLE 10 10 10\nATTACK 0\nEND\n");
        assert_eq!(
            res,
            Err(CompileError::TooManyEnemies {
                species: SpeciesId(1),
                sector: HERE,
                max: 1,
            })
        );
    }

    #[test]
    fn too_many_battles_aborts() {
        let mut g = galaxy();
        g.presences.push(Presence {
            species: SpeciesId(1),
            sector: Sector::new(1, 1, 1),
            planet: None,
        });
        let mut reg = BattleRegistry::default();
        let config = CompileConfig {
            max_battles: 1,
            ..CompileConfig::default()
        };
        let (res, _) = run(&mut g, &mut reg, &config, 1, "START COMBAT\nBATTLE 10 10 10\nBATTLE 1 1 1\n");
        assert_eq!(res, Err(CompileError::TooManyBattles(1)));
    }

    #[test]
    fn hide_needs_battle_context_and_landed_ship() {
        let mut g = galaxy();
        g.ships.push(Ship {
            class: "TR1".to_string(),
            name: "Ark".to_string(),
            owner: SpeciesId(1),
            sector: HERE,
            planet: Some(3),
            status: ShipStatus::OnSurface,
            hidden: false,
        });
        let mut reg = BattleRegistry::default();
        let config = CompileConfig::default();
        let (res, _) = run(&mut g, &mut reg, &config, 1, "START COMBAT\nHIDE Ark\nBATTLE 10 10 10\nHIDE TR1 Ark\n");
        assert_eq!(res.unwrap().rejected, 1);
        assert!(g.ships[0].hidden);
    }
}
