//! Calendar - month grid with a keyboard cursor and an optional selection.
//!
//! The grid always shows six Monday-first weeks, so every cell keeps the
//! same node id as the month changes. Picking the selected date again
//! clears the selection.

use chrono::{Datelike, Days, Local, Months, NaiveDate};
use spark_signals::{signal, Signal};
use tracing::debug;

use crate::pipeline::{allocate_id, Node, NodeId, NodeKind};
use crate::state::KeyboardEvent;
use crate::types::Attr;

use super::{control_base_impl, Control, ControlBase, ControlEvent, ControlKind, DateCallback};

const WEEKS: usize = 6;
const CELLS: usize = WEEKS * 7;
const WEEKDAYS: &str = "Mo Tu We Th Fr Sa Su";

#[derive(Clone)]
pub struct CalendarProps {
    /// Date the cursor starts on; defaults to today
    pub today: NaiveDate,
    pub selected: Option<NaiveDate>,
    pub enabled: bool,
    pub on_select: Option<DateCallback>,
}

impl Default for CalendarProps {
    fn default() -> Self {
        Self {
            today: Local::now().date_naive(),
            selected: None,
            enabled: true,
            on_select: None,
        }
    }
}

/// Node ids for the fixed parts of the grid.
#[derive(Clone)]
struct GridIds {
    header: NodeId,
    prev: NodeId,
    title: NodeId,
    next: NodeId,
    weekdays: NodeId,
    weeks: [NodeId; WEEKS],
    cells: Vec<NodeId>,
}

impl GridIds {
    fn allocate() -> Self {
        Self {
            header: allocate_id(),
            prev: allocate_id(),
            title: allocate_id(),
            next: allocate_id(),
            weekdays: allocate_id(),
            weeks: std::array::from_fn(|_| allocate_id()),
            cells: (0..CELLS).map(|_| allocate_id()).collect(),
        }
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.checked_sub_days(Days::new(u64::from(date.day0())))
        .unwrap_or(date)
}

/// Monday on or before the first of `month`.
fn grid_start(month: NaiveDate) -> NaiveDate {
    let first = first_of_month(month);
    let offset = u64::from(first.weekday().num_days_from_monday());
    first.checked_sub_days(Days::new(offset)).unwrap_or(first)
}

#[derive(Clone)]
pub struct Calendar {
    base: ControlBase,
    ids: GridIds,
    month: Signal<NaiveDate>,
    cursor: Signal<NaiveDate>,
    selected: Signal<Option<NaiveDate>>,
    on_select: Option<DateCallback>,
}

impl Calendar {
    pub fn new(props: CalendarProps) -> Self {
        let cursor = props.selected.unwrap_or(props.today);
        Self {
            base: ControlBase::new(props.enabled),
            ids: GridIds::allocate(),
            month: signal(first_of_month(cursor)),
            cursor: signal(cursor),
            selected: signal(props.selected),
            on_select: props.on_select,
        }
    }

    pub fn selected(&self) -> Option<NaiveDate> {
        self.selected.get()
    }

    pub fn cursor(&self) -> NaiveDate {
        self.cursor.get()
    }

    /// First day of the visible month.
    pub fn visible_month(&self) -> NaiveDate {
        self.month.get()
    }

    /// Date shown in grid cell `index` (0..42).
    pub fn date_at(&self, index: usize) -> Option<NaiveDate> {
        if index >= CELLS {
            return None;
        }
        grid_start(self.month.get()).checked_add_days(Days::new(index as u64))
    }

    /// Node id of grid cell `index`.
    pub fn cell_id(&self, index: usize) -> Option<NodeId> {
        self.ids.cells.get(index).copied()
    }

    fn move_cursor(&self, date: Option<NaiveDate>) -> bool {
        let Some(date) = date else {
            return false;
        };
        if date == self.cursor.get() {
            return false;
        }
        self.cursor.set(date);
        let month = first_of_month(date);
        if month != self.month.get() {
            self.month.set(month);
        }
        self.refresh();
        true
    }

    fn pick(&self, date: NaiveDate) -> bool {
        let selection = if self.selected.get() == Some(date) {
            None
        } else {
            Some(date)
        };
        self.selected.set(selection);
        self.cursor.set(date);
        self.month.set(first_of_month(date));
        self.refresh();
        if let Some(on_select) = &self.on_select {
            on_select(selection);
        }
        true
    }

    fn handle_key(&self, key: &KeyboardEvent) -> bool {
        let cursor = self.cursor.get();
        match key.key.as_str() {
            "ArrowLeft" => self.move_cursor(cursor.checked_sub_days(Days::new(1))),
            "ArrowRight" => self.move_cursor(cursor.checked_add_days(Days::new(1))),
            "ArrowUp" => self.move_cursor(cursor.checked_sub_days(Days::new(7))),
            "ArrowDown" => self.move_cursor(cursor.checked_add_days(Days::new(7))),
            "PageUp" => self.move_cursor(cursor.checked_sub_months(Months::new(1))),
            "PageDown" => self.move_cursor(cursor.checked_add_months(Months::new(1))),
            _ if key.is_activation() => self.pick(cursor),
            _ => false,
        }
    }
}

impl Control for Calendar {
    control_base_impl!();

    fn kind(&self) -> ControlKind {
        ControlKind::Calendar
    }

    fn render(&self) -> Node {
        let month = self.month.get();
        let cursor = self.cursor.get();
        let selected = self.selected.get();
        let start = grid_start(month);

        let header = Node::new(self.ids.header, NodeKind::Row).with_children(vec![
            Node::new(self.ids.prev, NodeKind::Part).with_text("‹ "),
            Node::new(self.ids.title, NodeKind::Text)
                .with_text(format!("{:<14}", month.format("%B %Y").to_string()))
                .with_attrs(Attr::BOLD),
            Node::new(self.ids.next, NodeKind::Part).with_text(" ›"),
        ]);
        let weekdays = Node::new(self.ids.weekdays, NodeKind::Text)
            .with_text(WEEKDAYS)
            .with_attrs(Attr::DIM);

        let mut children = vec![header, weekdays];
        for (week, week_id) in self.ids.weeks.iter().enumerate() {
            let cells = (0..7)
                .map(|day| {
                    let index = week * 7 + day;
                    let date = start.checked_add_days(Days::new(index as u64));
                    let text = date.map(|d| format!("{:>2} ", d.day())).unwrap_or_default();
                    let mut attrs = Attr::NONE;
                    if let Some(d) = date {
                        if d.month() != month.month() {
                            attrs |= Attr::DIM;
                        }
                        if Some(d) == selected {
                            attrs |= Attr::INVERSE;
                        }
                        if d == cursor {
                            attrs |= Attr::UNDERLINE;
                        }
                    }
                    Node::new(self.ids.cells[index], NodeKind::Part)
                        .with_text(text)
                        .with_attrs(attrs)
                })
                .collect();
            children.push(Node::new(*week_id, NodeKind::Row).with_children(cells));
        }

        self.base.node(ControlKind::Calendar).with_children(children)
    }

    fn handle_input(&self, event: &ControlEvent) -> bool {
        if !self.is_enabled() {
            debug!(id = %self.id(), "disabled calendar ignored input");
            return false;
        }
        match event {
            ControlEvent::PickDate(date) => self.pick(*date),
            ControlEvent::Key(key) if key.is_press() => self.handle_key(key),
            _ => false,
        }
    }

    fn hit(&self, target: NodeId, _at: (f64, f64)) -> Option<ControlEvent> {
        if target == self.ids.prev {
            return Some(ControlEvent::Key(KeyboardEvent::new("PageUp")));
        }
        if target == self.ids.next {
            return Some(ControlEvent::Key(KeyboardEvent::new("PageDown")));
        }
        let index = self.ids.cells.iter().position(|id| *id == target)?;
        self.date_at(index).map(ControlEvent::PickDate)
    }
}
