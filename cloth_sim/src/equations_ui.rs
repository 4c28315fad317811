//! Equations sidebar and status bar for the cloth simulation
//!
//! Displays the governing equations and live simulation state using egui.

use egui::{Color32, Context, RichText};

use cloth_sim::Simulation;

/// An equation with its name and formula
pub struct Equation {
    pub name: &'static str,
    pub formula: &'static str,
    pub description: &'static str,
}

/// Draw the equations sidebar
pub fn draw_equations_sidebar(
    ctx: &Context,
    title: &str,
    equations: &[Equation],
    variables: &[(&str, &str)],
) {
    egui::SidePanel::right("equations_panel")
        .resizable(true)
        .default_width(280.0)
        .show(ctx, |ui| {
            ui.heading(RichText::new(title).color(Color32::LIGHT_BLUE));
            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.collapsing(RichText::new("📐 Equations").strong(), |ui| {
                    for eq in equations {
                        ui.group(|ui| {
                            ui.label(RichText::new(eq.name).strong().color(Color32::YELLOW));
                            ui.label(RichText::new(eq.formula).monospace().color(Color32::WHITE));
                            ui.label(RichText::new(eq.description).small().italics());
                        });
                        ui.add_space(4.0);
                    }
                });

                ui.add_space(8.0);

                ui.collapsing(RichText::new("📖 Variables").strong(), |ui| {
                    egui::Grid::new("variables_grid")
                        .num_columns(2)
                        .spacing([10.0, 4.0])
                        .show(ui, |ui| {
                            for (symbol, meaning) in variables {
                                ui.label(RichText::new(*symbol).monospace().color(Color32::LIGHT_GREEN));
                                ui.label(*meaning);
                                ui.end_row();
                            }
                        });
                });
            });
        });
}

/// Top bar with the current modes and spring counts
pub fn draw_status_bar(ctx: &Context, sim: &Simulation, camera_active: bool, fps: f32) {
    egui::TopBottomPanel::top("status").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.label(format!("Mode: {}", sim.mode().label()));
            ui.separator();
            ui.label(format!("Pinning: {}", sim.pinning().label()));
            ui.separator();
            ui.label(format!("Object: {}", sim.collision().shape.label()));
            ui.separator();
            ui.label(format!(
                "Springs: {} / {}",
                sim.network().active_count(),
                sim.network().len()
            ));
            ui.separator();
            ui.label(format!("{:.0} fps", fps));
            ui.separator();
            if camera_active {
                ui.label(RichText::new("CAMERA").color(Color32::YELLOW));
            } else {
                ui.label(RichText::new("INTERACT").color(Color32::GREEN));
            }
        });
    });
}

// ============================================================================
// Cloth Equations
// ============================================================================

pub const CLOTH_EQUATIONS: &[Equation] = &[
    Equation {
        name: "Verlet Integration",
        formula: "xₙ₊₁ = xₙ + (xₙ - xₙ₋₁) + a·Δt²",
        description: "Velocity is implicit in the position history",
    },
    Equation {
        name: "Hooke's Law",
        formula: "F⃗ = k·(|d⃗| - L₀)·d̂",
        description: "Spring force along the connecting direction",
    },
    Equation {
        name: "Progressive Stiffening",
        formula: "F⃗ ← F⃗·(|d⃗|/L₀)³  if |d⃗|/L₀ > 1.1",
        description: "Resists runaway stretch",
    },
    Equation {
        name: "Spring Damping",
        formula: "F⃗_d = c·((Δx₂ - Δx₁)·d̂)·d̂",
        description: "Damps relative motion along the spring",
    },
    Equation {
        name: "Stretch Ceiling",
        formula: "|d⃗| ≤ 1.2·L₀",
        description: "Enforced by positional relaxation each sweep",
    },
    Equation {
        name: "Wind Gust",
        formula: "w(t) = 8 + 5·sin(1.5t) + 3·sin(0.5t + 1)",
        description: "Flag mode wind strength along +x",
    },
];

pub const CLOTH_VARIABLES: &[(&str, &str)] = &[
    ("x", "Particle position"),
    ("a", "Accumulated acceleration (F/m)"),
    ("Δt", "Frame time, clamped to 1/60 s"),
    ("k", "Spring stiffness"),
    ("c", "Spring damping coefficient"),
    ("L₀", "Rest length"),
    ("d⃗", "Vector between spring endpoints"),
    ("w", "Wind gust strength"),
];
