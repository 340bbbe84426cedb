//! UI string tables.
//!
//! The server picks the language through `/api/config`; until then the
//! configured default is used.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lang {
    #[default]
    Ru,
    En,
}

impl Lang {
    /// Parse a language code such as `ru`, `en` or `en-US`.
    pub fn parse(code: &str) -> Option<Self> {
        let code = code.trim().to_ascii_lowercase();
        let primary = code.split(['-', '_']).next().unwrap_or_default();
        match primary {
            "ru" => Some(Self::Ru),
            "en" => Some(Self::En),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ru => "ru",
            Self::En => "en",
        }
    }

    pub fn strings(self) -> &'static Strings {
        match self {
            Self::Ru => &RU,
            Self::En => &EN,
        }
    }
}

pub struct Strings {
    pub lists: &'static str,
    pub tasks: &'static str,
    pub task_view: &'static str,
    pub select_list: &'static str,
    pub select_task: &'static str,
    pub importance: &'static str,
    pub deadline: &'static str,
    pub no_deadline: &'static str,
    pub fill_fields: &'static str,
    pub invalid_date: &'static str,
    pub invalid_priority: &'static str,
    pub empty_name: &'static str,
    pub list_exists: &'static str,
    pub login_title: &'static str,
    pub login: &'static str,
    pub password: &'static str,
    pub new_task: &'static str,
    pub new_list: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub priority: &'static str,
    pub date: &'static str,
    pub list_not_deleted: &'static str,
}

static RU: Strings = Strings {
    lists: "Списки",
    tasks: "Задачи",
    task_view: "Просмотр задачи",
    select_list: "Выберите список задач",
    select_task: "Выберите задачу для просмотра деталей",
    importance: "Уровень важности",
    deadline: "Срок выполнения",
    no_deadline: "Бессрочно",
    fill_fields: "Заполните поля",
    invalid_date: "Неверный формат даты",
    invalid_priority: "Уровень приоритета должен быть числом",
    empty_name: "Введите название",
    list_exists: "Список с таким названием уже существует",
    login_title: "Вход",
    login: "Логин",
    password: "Пароль",
    new_task: "Новая задача",
    new_list: "Новый список",
    name: "Название",
    description: "Описание",
    priority: "Приоритет",
    date: "Срок (ДД.ММ.ГГГГ)",
    list_not_deleted: "Не удалось удалить список",
};

static EN: Strings = Strings {
    lists: "Lists",
    tasks: "Tasks",
    task_view: "Task",
    select_list: "Select a task list",
    select_task: "Select a task to see its details",
    importance: "Importance",
    deadline: "Deadline",
    no_deadline: "No deadline",
    fill_fields: "Fill in all fields",
    invalid_date: "Invalid date format",
    invalid_priority: "Priority must be a number",
    empty_name: "Enter a name",
    list_exists: "A list with this name already exists",
    login_title: "Sign in",
    login: "Login",
    password: "Password",
    new_task: "New task",
    new_list: "New list",
    name: "Name",
    description: "Description",
    priority: "Priority",
    date: "Deadline (DD.MM.YYYY)",
    list_not_deleted: "Could not delete the list",
};
