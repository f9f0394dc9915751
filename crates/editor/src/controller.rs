//! The interaction mode controller.
//!
//! Multiplexes a single "click on the image" gesture into the graph and
//! placement mutations the current mode calls for. The controller itself
//! performs no I/O: each accepted gesture yields a [`Command`] describing
//! the authority call to make and which cache to reload on success, and
//! the embedding layer reports completion through [`EditorController::finish`].
//!
//! Every dispatched command carries a monotonically increasing gesture id.
//! A completion for any gesture other than the one currently in flight is
//! discarded, so a cancelled or superseded request can never resurrect a
//! cleared selection.

use authority::{AuthorityError, Landmark, Point3, Sku, WaypointId};
use foundation::{ContainerRect, NaturalSize, Vec2, to_natural};

use crate::messages::MessageLog;
use crate::mode::{InteractionMode, Selection, Tool};

/// Identifies one dispatched mutation gesture.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Gesture(pub u64);

/// The authority mutation a gesture resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorityCall {
    AssignProduct { sku: Sku, waypoint_id: WaypointId },
    SetLandmark { kind: Landmark, location: Point3 },
    CreateWaypoint { location: Point3 },
    ConnectWaypoints { a: WaypointId, b: WaypointId },
    MoveWaypoint { id: WaypointId, location: Point3 },
    DeleteWaypoint { id: WaypointId },
}

/// Which cached snapshot to refresh after the call succeeds.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Reload {
    Products,
    Waypoints,
    Settings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub gesture: Gesture,
    pub call: AuthorityCall,
    pub reload: Reload,
}

#[derive(Debug)]
pub struct EditorController {
    mode: InteractionMode,
    selection: Selection,
    /// The one gesture whose authority round-trip is outstanding, if any.
    in_flight: Option<Gesture>,
    next_gesture: u64,
    /// Waypoint awaiting delete confirmation.
    pending_delete: Option<WaypointId>,
    messages: MessageLog,
}

impl EditorController {
    pub fn new() -> Self {
        Self {
            mode: InteractionMode::Idle,
            selection: Selection::None,
            in_flight: None,
            next_gesture: 0,
            pending_delete: None,
            messages: MessageLog::default(),
        }
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Waypoint the overlay should visually distinguish right now.
    pub fn highlight(&self) -> Option<&WaypointId> {
        self.selection.highlight()
    }

    pub fn pending_delete(&self) -> Option<&WaypointId> {
        self.pending_delete.as_ref()
    }

    pub fn messages(&self) -> &MessageLog {
        &self.messages
    }

    pub fn messages_mut(&mut self) -> &mut MessageLog {
        &mut self.messages
    }

    /// Whether the mode-entry buttons are currently available. They are
    /// not while another mode is active or a mutation is outstanding, so
    /// at most one gesture is ever in flight from this client.
    pub fn can_enter_tool(&self) -> bool {
        self.mode == InteractionMode::Idle && self.in_flight.is_none()
    }

    /// Enters the mode behind a toolbar button. Returns false when the
    /// button should have been disabled.
    pub fn enter_tool(&mut self, tool: Tool) -> bool {
        if !self.can_enter_tool() {
            return false;
        }
        self.selection = Selection::None;
        self.pending_delete = None;
        self.mode = tool.entry_mode();
        true
    }

    /// Selecting a product from the list enters placement mode (or swaps
    /// the product being placed). Ignored in every other mode.
    pub fn select_product(&mut self, sku: Sku) -> bool {
        let allowed = matches!(
            self.mode,
            InteractionMode::Idle | InteractionMode::PlacingProduct
        ) && self.in_flight.is_none();
        if !allowed {
            return false;
        }
        self.selection = Selection::Product(sku);
        self.mode = InteractionMode::PlacingProduct;
        true
    }

    /// Explicit cancel: back to idle with no transient state. Any
    /// outstanding round-trip result will be discarded when it arrives.
    pub fn cancel(&mut self) {
        self.mode = InteractionMode::Idle;
        self.selection = Selection::None;
        self.pending_delete = None;
        self.in_flight = None;
    }

    /// A click on the base image (not on a waypoint).
    ///
    /// Coordinate-targeted modes transform the click into natural space
    /// and dispatch; if the image has not loaded yet the click is silently
    /// ignored. Waypoint-targeted modes ignore map clicks entirely.
    pub fn map_click(
        &mut self,
        click: Vec2,
        rect: ContainerRect,
        natural: NaturalSize,
    ) -> Option<Command> {
        if self.in_flight.is_some() {
            return None;
        }

        match self.mode {
            InteractionMode::SetEntrance | InteractionMode::SetCheckout => {
                let (x, y) = to_natural(click, rect, natural).ok()?;
                let kind = if self.mode == InteractionMode::SetEntrance {
                    Landmark::Entrance
                } else {
                    Landmark::Checkout
                };
                self.mode = InteractionMode::Idle;
                Some(self.dispatch(
                    AuthorityCall::SetLandmark {
                        kind,
                        location: Point3::new(x, y),
                    },
                    Reload::Settings,
                ))
            }
            InteractionMode::CreateWaypoint => {
                let (x, y) = to_natural(click, rect, natural).ok()?;
                // Stays in create mode for rapid multi-create.
                Some(self.dispatch(
                    AuthorityCall::CreateWaypoint {
                        location: Point3::new(x, y),
                    },
                    Reload::Waypoints,
                ))
            }
            InteractionMode::MoveTarget => {
                let (x, y) = to_natural(click, rect, natural).ok()?;
                let Selection::MoveOf(id) = std::mem::take(&mut self.selection) else {
                    // Selection lost (cancelled); drop back to idle.
                    self.mode = InteractionMode::Idle;
                    return None;
                };
                self.mode = InteractionMode::Idle;
                Some(self.dispatch(
                    AuthorityCall::MoveWaypoint {
                        id,
                        location: Point3::new(x, y),
                    },
                    Reload::Waypoints,
                ))
            }
            // Only clicks on a rendered waypoint advance these modes.
            InteractionMode::Idle
            | InteractionMode::PlacingProduct
            | InteractionMode::ConnectFirst
            | InteractionMode::ConnectSecond
            | InteractionMode::MoveSelect
            | InteractionMode::DeleteSelect => None,
        }
    }

    /// A click on a rendered waypoint marker.
    ///
    /// In `SetEntrance`/`SetCheckout`/`CreateWaypoint` the embedding view
    /// must route the gesture through [`Self::map_click`] instead: those
    /// modes care only about coordinates, and the marker handler stops
    /// propagation so the same gesture never fires both paths.
    pub fn waypoint_click(&mut self, id: &str) -> Option<Command> {
        if self.in_flight.is_some() {
            return None;
        }

        match self.mode {
            InteractionMode::PlacingProduct => {
                let Selection::Product(sku) = &self.selection else {
                    return None;
                };
                // Stays in placement mode so the same product (or the
                // next one picked) can be placed again.
                let sku = sku.clone();
                Some(self.dispatch(
                    AuthorityCall::AssignProduct {
                        sku,
                        waypoint_id: id.to_string(),
                    },
                    Reload::Products,
                ))
            }
            InteractionMode::ConnectFirst => {
                self.selection = Selection::ConnectFrom(id.to_string());
                self.mode = InteractionMode::ConnectSecond;
                None
            }
            InteractionMode::ConnectSecond => {
                let Selection::ConnectFrom(first) = &self.selection else {
                    return None;
                };
                if first == id {
                    // The second endpoint must differ; the gesture stays armed.
                    return None;
                }
                let a = first.clone();
                self.selection = Selection::None;
                // Loops back so further connections can be chained.
                self.mode = InteractionMode::ConnectFirst;
                Some(self.dispatch(
                    AuthorityCall::ConnectWaypoints {
                        a,
                        b: id.to_string(),
                    },
                    Reload::Waypoints,
                ))
            }
            InteractionMode::MoveSelect => {
                self.selection = Selection::MoveOf(id.to_string());
                self.mode = InteractionMode::MoveTarget;
                None
            }
            InteractionMode::DeleteSelect => {
                self.pending_delete = Some(id.to_string());
                None
            }
            InteractionMode::Idle
            | InteractionMode::SetEntrance
            | InteractionMode::SetCheckout
            | InteractionMode::CreateWaypoint
            | InteractionMode::MoveTarget => None,
        }
    }

    /// Confirms the pending waypoint deletion and dispatches it.
    pub fn confirm_delete(&mut self) -> Option<Command> {
        if self.in_flight.is_some() {
            return None;
        }
        let id = self.pending_delete.take()?;
        self.mode = InteractionMode::Idle;
        Some(self.dispatch(AuthorityCall::DeleteWaypoint { id }, Reload::Waypoints))
    }

    /// Declines the pending deletion; delete mode stays armed so another
    /// waypoint can be picked.
    pub fn decline_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Reports the outcome of a dispatched command.
    ///
    /// Returns false when the result was discarded because the gesture is
    /// no longer the one in flight (cancelled or superseded). On failure
    /// the in-progress gesture is aborted: a transient message is logged,
    /// selections are cleared, and the machine returns to idle.
    pub fn finish(&mut self, gesture: Gesture, outcome: Result<(), AuthorityError>) -> bool {
        if self.in_flight != Some(gesture) {
            return false;
        }
        self.in_flight = None;

        if let Err(err) = outcome {
            self.messages.error(err.to_string());
            self.selection = Selection::None;
            self.pending_delete = None;
            self.mode = InteractionMode::Idle;
        }
        true
    }

    fn dispatch(&mut self, call: AuthorityCall, reload: Reload) -> Command {
        let gesture = Gesture(self.next_gesture);
        self.next_gesture += 1;
        self.in_flight = Some(gesture);
        Command {
            gesture,
            call,
            reload,
        }
    }
}

impl Default for EditorController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{AuthorityCall, Command, EditorController, Reload};
    use crate::mode::{InteractionMode, Selection, Tool};
    use authority::{
        Authority, AuthorityError, FacilitySettings, InMemoryAuthority, Landmark, Point3,
    };
    use foundation::{ContainerRect, NaturalSize, Vec2};
    use pretty_assertions::assert_eq;

    fn rect() -> ContainerRect {
        ContainerRect::new(0.0, 0.0, 400.0, 400.0)
    }

    fn natural() -> NaturalSize {
        NaturalSize::new(400, 400)
    }

    #[test]
    fn selecting_a_product_enters_and_stays_in_placement() {
        let mut editor = EditorController::new();
        assert!(editor.select_product("p1".to_string()));
        assert_eq!(editor.mode(), InteractionMode::PlacingProduct);

        let cmd = editor.waypoint_click("w1").expect("assign command");
        assert_eq!(
            cmd.call,
            AuthorityCall::AssignProduct {
                sku: "p1".to_string(),
                waypoint_id: "w1".to_string(),
            }
        );
        assert_eq!(cmd.reload, Reload::Products);
        assert_eq!(editor.mode(), InteractionMode::PlacingProduct);
        assert_eq!(editor.selection(), &Selection::Product("p1".to_string()));

        // Repeat placement after the first one completes.
        editor.finish(cmd.gesture, Ok(()));
        assert!(editor.waypoint_click("w2").is_some());
    }

    #[test]
    fn set_entrance_transforms_the_click_and_returns_to_idle() {
        let mut editor = EditorController::new();
        assert!(editor.enter_tool(Tool::SetEntrance));
        assert_eq!(editor.mode(), InteractionMode::SetEntrance);

        let cmd = editor
            .map_click(Vec2::new(100.0, 200.0), rect(), natural())
            .expect("landmark command");
        assert_eq!(
            cmd.call,
            AuthorityCall::SetLandmark {
                kind: Landmark::Entrance,
                location: Point3::new(100, 200),
            }
        );
        assert_eq!(cmd.reload, Reload::Settings);
        assert_eq!(editor.mode(), InteractionMode::Idle);
    }

    #[test]
    fn tool_buttons_are_disabled_while_a_mode_is_active() {
        let mut editor = EditorController::new();
        assert!(editor.enter_tool(Tool::ConnectWaypoints));
        assert!(!editor.can_enter_tool());
        assert!(!editor.enter_tool(Tool::SetCheckout));
        assert_eq!(editor.mode(), InteractionMode::ConnectFirst);
    }

    #[test]
    fn create_mode_supports_sequential_creates_with_no_edges() {
        let mut editor = EditorController::new();
        assert!(editor.enter_tool(Tool::CreateWaypoint));

        let first = editor
            .map_click(Vec2::new(50.0, 50.0), rect(), natural())
            .expect("first create");
        assert_eq!(editor.mode(), InteractionMode::CreateWaypoint);

        // One mutation in flight at a time: the next click waits for the
        // previous round-trip.
        assert!(editor.map_click(Vec2::new(90.0, 90.0), rect(), natural()).is_none());
        assert!(editor.finish(first.gesture, Ok(())));

        let second = editor
            .map_click(Vec2::new(90.0, 90.0), rect(), natural())
            .expect("second create");
        assert_ne!(first.gesture, second.gesture);
        assert_eq!(
            second.call,
            AuthorityCall::CreateWaypoint {
                location: Point3::new(90, 90),
            }
        );
        // Neither click produced a connect request.
        for cmd in [&first, &second] {
            assert!(matches!(cmd.call, AuthorityCall::CreateWaypoint { .. }));
        }
    }

    #[test]
    fn connect_loops_for_chaining() {
        let mut editor = EditorController::new();
        assert!(editor.enter_tool(Tool::ConnectWaypoints));

        assert!(editor.waypoint_click("w1").is_none());
        assert_eq!(editor.mode(), InteractionMode::ConnectSecond);
        assert_eq!(editor.highlight().map(String::as_str), Some("w1"));

        let cmd = editor.waypoint_click("w2").expect("connect command");
        assert_eq!(
            cmd.call,
            AuthorityCall::ConnectWaypoints {
                a: "w1".to_string(),
                b: "w2".to_string(),
            }
        );
        assert_eq!(editor.mode(), InteractionMode::ConnectFirst);
        assert!(editor.selection().is_none());

        // Chain the next pair without re-entering the tool.
        editor.finish(cmd.gesture, Ok(()));
        assert!(editor.waypoint_click("w2").is_none());
        assert!(editor.waypoint_click("w3").is_some());
    }

    #[test]
    fn connecting_a_waypoint_to_itself_is_ignored() {
        let mut editor = EditorController::new();
        editor.enter_tool(Tool::ConnectWaypoints);
        editor.waypoint_click("w1");

        assert!(editor.waypoint_click("w1").is_none());
        // Gesture stays armed with the same first endpoint.
        assert_eq!(editor.mode(), InteractionMode::ConnectSecond);
        assert_eq!(editor.highlight().map(String::as_str), Some("w1"));
    }

    #[test]
    fn move_remembers_the_target_then_takes_a_map_click() {
        let mut editor = EditorController::new();
        editor.enter_tool(Tool::MoveWaypoint);

        assert!(editor.waypoint_click("w1").is_none());
        assert_eq!(editor.mode(), InteractionMode::MoveTarget);
        assert_eq!(editor.highlight().map(String::as_str), Some("w1"));

        let cmd = editor
            .map_click(Vec2::new(10.0, 20.0), rect(), natural())
            .expect("move command");
        assert_eq!(
            cmd.call,
            AuthorityCall::MoveWaypoint {
                id: "w1".to_string(),
                location: Point3::new(10, 20),
            }
        );
        assert_eq!(editor.mode(), InteractionMode::Idle);
        assert!(editor.selection().is_none());
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut editor = EditorController::new();
        editor.enter_tool(Tool::DeleteWaypoint);

        assert!(editor.waypoint_click("w1").is_none());
        assert_eq!(editor.pending_delete().map(String::as_str), Some("w1"));

        let cmd = editor.confirm_delete().expect("delete command");
        assert_eq!(
            cmd.call,
            AuthorityCall::DeleteWaypoint {
                id: "w1".to_string(),
            }
        );
        assert_eq!(editor.mode(), InteractionMode::Idle);
    }

    #[test]
    fn declining_a_delete_keeps_the_mode_armed() {
        let mut editor = EditorController::new();
        editor.enter_tool(Tool::DeleteWaypoint);
        editor.waypoint_click("w1");
        editor.decline_delete();

        assert!(editor.pending_delete().is_none());
        assert!(editor.confirm_delete().is_none());
        assert_eq!(editor.mode(), InteractionMode::DeleteSelect);
    }

    #[test]
    fn map_clicks_are_ignored_in_waypoint_targeted_modes() {
        for tool in [Tool::ConnectWaypoints, Tool::MoveWaypoint, Tool::DeleteWaypoint] {
            let mut editor = EditorController::new();
            editor.enter_tool(tool);
            let before = editor.mode();
            assert!(editor.map_click(Vec2::new(5.0, 5.0), rect(), natural()).is_none());
            assert_eq!(editor.mode(), before, "map click must not advance {tool:?}");
        }
    }

    #[test]
    fn clicks_before_the_image_loads_are_silently_ignored() {
        let mut editor = EditorController::new();
        editor.enter_tool(Tool::CreateWaypoint);

        let cmd = editor.map_click(Vec2::new(5.0, 5.0), rect(), NaturalSize::new(0, 0));
        assert!(cmd.is_none());
        assert_eq!(editor.mode(), InteractionMode::CreateWaypoint);
        assert!(editor.messages().messages().is_empty());
    }

    #[test]
    fn cancel_clears_every_transient_from_any_mode() {
        let tools = [
            Tool::SetEntrance,
            Tool::SetCheckout,
            Tool::CreateWaypoint,
            Tool::ConnectWaypoints,
            Tool::MoveWaypoint,
            Tool::DeleteWaypoint,
        ];
        for tool in tools {
            let mut editor = EditorController::new();
            editor.enter_tool(tool);
            editor.cancel();
            assert_eq!(editor.mode(), InteractionMode::Idle);
            assert!(editor.selection().is_none());
            assert!(editor.pending_delete().is_none());
        }

        let mut editor = EditorController::new();
        editor.select_product("p1".to_string());
        editor.cancel();
        assert_eq!(editor.mode(), InteractionMode::Idle);
        assert!(editor.selection().is_none());
    }

    #[test]
    fn failure_surfaces_a_message_and_returns_to_idle() {
        let mut editor = EditorController::new();
        editor.select_product("p1".to_string());
        let cmd = editor.waypoint_click("ghost").expect("assign command");

        assert!(editor.finish(cmd.gesture, Err(AuthorityError::NotFound)));
        assert_eq!(editor.mode(), InteractionMode::Idle);
        assert!(editor.selection().is_none());
        assert_eq!(editor.messages().messages().len(), 1);
    }

    #[test]
    fn stale_results_after_cancel_are_discarded() {
        let mut editor = EditorController::new();
        editor.select_product("p1".to_string());
        let cmd = editor.waypoint_click("w1").expect("assign command");

        editor.cancel();
        editor.select_product("p2".to_string());

        // The old round-trip lands late; it must not be applied.
        assert!(!editor.finish(cmd.gesture, Ok(())));
        assert_eq!(editor.selection(), &Selection::Product("p2".to_string()));
        assert_eq!(editor.mode(), InteractionMode::PlacingProduct);
    }

    /// Drives a command against the in-memory authority the way the
    /// embedding glue would, including the reload that follows success.
    fn run(
        auth: &mut InMemoryAuthority,
        editor: &mut EditorController,
        graph: &mut scene::GraphCache,
        settings: &mut FacilitySettings,
        cmd: Command,
    ) {
        let outcome = match &cmd.call {
            AuthorityCall::AssignProduct { sku, waypoint_id } => auth
                .assign_product_to_waypoint(sku, waypoint_id)
                .map(|_| ()),
            AuthorityCall::SetLandmark { kind, location } => {
                auth.update_landmark(*kind, *location).map(|_| ())
            }
            AuthorityCall::CreateWaypoint { location } => {
                auth.create_waypoint(*location).map(|_| ())
            }
            AuthorityCall::ConnectWaypoints { a, b } => auth.connect_waypoints(a, b),
            AuthorityCall::MoveWaypoint { id, location } => {
                auth.move_waypoint(id, *location).map(|_| ())
            }
            AuthorityCall::DeleteWaypoint { id } => auth.delete_waypoint(id),
        };
        let ok = outcome.is_ok();
        editor.finish(cmd.gesture, outcome);
        if ok {
            match cmd.reload {
                Reload::Waypoints => graph.replace_all(auth.list_waypoints().expect("list")),
                Reload::Settings => *settings = auth.get_settings().expect("settings"),
                Reload::Products => {}
            }
        }
    }

    #[test]
    fn end_to_end_edit_session_produces_a_consistent_overlay() {
        let mut auth = InMemoryAuthority::new();
        let mut editor = EditorController::new();
        let mut graph = scene::GraphCache::new();
        let mut settings = FacilitySettings::default();

        // Create two waypoints.
        editor.enter_tool(Tool::CreateWaypoint);
        for click in [Vec2::new(100.0, 100.0), Vec2::new(200.0, 100.0)] {
            let cmd = editor.map_click(click, rect(), natural()).expect("create");
            run(&mut auth, &mut editor, &mut graph, &mut settings, cmd);
        }
        editor.cancel();
        assert_eq!(graph.len(), 2);

        // Connect them.
        let ids: Vec<String> = graph.waypoints().map(|w| w.id.clone()).collect();
        editor.enter_tool(Tool::ConnectWaypoints);
        editor.waypoint_click(&ids[0]);
        let cmd = editor.waypoint_click(&ids[1]).expect("connect");
        run(&mut auth, &mut editor, &mut graph, &mut settings, cmd);
        editor.cancel();

        // Set the entrance.
        editor.enter_tool(Tool::SetEntrance);
        let cmd = editor
            .map_click(Vec2::new(10.0, 10.0), rect(), natural())
            .expect("entrance");
        run(&mut auth, &mut editor, &mut graph, &mut settings, cmd);

        let frame = scene::overlay_frame(&graph, &settings, editor.highlight(), natural());
        assert_eq!(frame.waypoints.len(), 2);
        assert_eq!(frame.edges.len(), 1);
        assert_eq!(frame.landmarks.len(), 1);
        assert!(editor.messages().messages().is_empty());
    }
}
