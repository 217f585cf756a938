//! Stack-based state machine.
//!
//! The owner `O` is the shared context every state works on. States live on a
//! stack: pushing one pauses the state below it without exiting it, and popping
//! the top state resumes the one underneath. Battles use it for their phases,
//! but nothing here knows about battles.

/// What a state wants the machine to do after it ran.
pub enum Transition<O> {
    None,
    Push(Box<dyn State<O>>),
    Pop,
    /// Replace the top state.
    Switch(Box<dyn State<O>>),
    /// Exit every state and stop.
    Quit,
}

impl<O> std::fmt::Debug for Transition<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Transition::None => write!(f, "None"),
            Transition::Push(state) => write!(f, "Push({})", state.name()),
            Transition::Pop => write!(f, "Pop"),
            Transition::Switch(state) => write!(f, "Switch({})", state.name()),
            Transition::Quit => write!(f, "Quit"),
        }
    }
}

pub trait State<O> {
    fn name(&self) -> &'static str;

    fn enter(&mut self, _owner: &mut O) {}

    fn exit(&mut self, _owner: &mut O) {}

    fn execute(&mut self, owner: &mut O) -> Transition<O>;
}

pub struct StateMachine<O> {
    owner: O,
    stack: Vec<Box<dyn State<O>>>,
}

impl<O> StateMachine<O> {
    pub fn new(owner: O) -> Self {
        Self {
            owner,
            stack: Vec::new(),
        }
    }

    pub fn push(&mut self, mut state: Box<dyn State<O>>) {
        log::debug!("Entering state {}", state.name());
        state.enter(&mut self.owner);
        self.stack.push(state);
    }

    /// Exit and drop the top state. Returns false if the stack was already empty.
    pub fn pop(&mut self) -> bool {
        match self.stack.pop() {
            Some(mut state) => {
                log::debug!("Exiting state {}", state.name());
                state.exit(&mut self.owner);
                true
            }
            None => false,
        }
    }

    pub fn change_state(&mut self, state: Box<dyn State<O>>) {
        self.pop();
        self.push(state);
    }

    fn clear(&mut self) {
        while self.pop() {}
    }

    /// Run the top state once and apply its transition.
    /// Returns false once there is nothing left to run.
    pub fn execute(&mut self) -> bool {
        let Some(state) = self.stack.last_mut() else {
            return false;
        };
        let transition = state.execute(&mut self.owner);
        log::trace!("{} -> {:?}", state.name(), transition);

        match transition {
            Transition::None => {}
            Transition::Push(next) => self.push(next),
            Transition::Pop => {
                self.pop();
            }
            Transition::Switch(next) => self.change_state(next),
            Transition::Quit => self.clear(),
        }
        !self.stack.is_empty()
    }

    pub fn current_state_name(&self) -> Option<&'static str> {
        self.stack.last().map(|state| state.name())
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn owner(&self) -> &O {
        &self.owner
    }

    pub fn owner_mut(&mut self) -> &mut O {
        &mut self.owner
    }

    /// Exits whatever is still on the stack and hands back the owner.
    pub fn into_owner(mut self) -> O {
        self.clear();
        self.owner
    }
}
